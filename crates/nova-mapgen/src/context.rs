use nova_mapgen_config::{OptionsScope, ResolvedOptions};
use nova_mapgen_types::{Type, TypeFactory};

use crate::builtin::BuiltInMethod;
use crate::method::{Method, SourceMethod};
use crate::resolver::MappingResolver;

/// State shared by every mapping method built for one mapper.
#[derive(Debug)]
pub struct MappingContext<'a> {
    types: &'a TypeFactory,
    mapper: &'a Type,
    resolver: MappingResolver<'a>,
    /// Mapper, mapper config and global layers, highest precedence first.
    layers: Vec<&'a OptionsScope>,
    verbose: bool,
}

impl<'a> MappingContext<'a> {
    pub fn new(
        types: &'a TypeFactory,
        mapper: &'a Type,
        candidates: &'a [SourceMethod],
        built_ins: &'a [BuiltInMethod],
        layers: Vec<&'a OptionsScope>,
    ) -> Self {
        Self {
            types,
            mapper,
            resolver: MappingResolver::new(types, mapper, candidates, built_ins),
            layers,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn types(&self) -> &'a TypeFactory {
        self.types
    }

    pub fn mapper_type(&self) -> &'a Type {
        self.mapper
    }

    pub fn resolver(&self) -> &MappingResolver<'a> {
        &self.resolver
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Options for a method or property: `local` layers (highest first) over the mapper layers.
    pub fn resolve_options(&self, local: &[&OptionsScope]) -> ResolvedOptions {
        let layers: Vec<&OptionsScope> = local.iter().chain(self.layers.iter()).copied().collect();
        ResolvedOptions::resolve(&layers)
    }

    /// Diagnostic element name for a method (`CarMapper#carToCarDto`).
    pub fn element(&self, method: &SourceMethod) -> String {
        format!("{}#{}", self.mapper.simple_name(), method.name())
    }
}
