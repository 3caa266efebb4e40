// This module implements the pipeline/fragment aggregator: it threads the
// read-only catalogue through an ordered list of generators and merges their
// named fragments into one mapping. The run is all-or-nothing: the catalogue is
// validated first, every generator's pre-flight check (substitution-table
// completeness) runs before any text is emitted, and a fragment name emitted by
// two generators is a fatal collision reported with both generator names. Output
// is a pure function of (catalogue, generator configuration), so repeated runs
// are byte-identical.

//! Pipeline/fragment aggregator.

use crate::error::{GenError, GenResult};
use crate::gen::{Fragments, Generator};
use crate::spec::Catalogue;
use std::collections::BTreeMap;

pub struct Pipeline {
    generators: Vec<Box<dyn Generator>>,
}

impl Pipeline {
    pub fn new(generators: Vec<Box<dyn Generator>>) -> Self {
        Pipeline { generators }
    }

    /// Run every generator in order and merge their fragments.
    pub fn run(&self, catalogue: &Catalogue) -> GenResult<Fragments> {
        catalogue.validate()?;
        for generator in &self.generators {
            generator.check(catalogue)?;
        }

        let mut merged = Fragments::new();
        let mut owners: BTreeMap<String, &'static str> = BTreeMap::new();
        for generator in &self.generators {
            log::debug!("running generator {}", generator.name());
            for (name, text) in generator.run(catalogue)? {
                if let Some(&first) = owners.get(&name) {
                    return Err(GenError::DuplicateFragment {
                        name,
                        first,
                        second: generator.name(),
                    });
                }
                owners.insert(name.clone(), generator.name());
                merged.insert(name, text);
            }
        }

        log::info!(
            "generated {} fragments from {} instructions",
            merged.len(),
            catalogue.insts().len()
        );
        Ok(merged)
    }
}
