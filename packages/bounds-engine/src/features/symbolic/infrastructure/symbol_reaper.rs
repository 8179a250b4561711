//! Symbol liveness
//!
//! The host decides which symbols and regions went out of scope. Checkers
//! may rescue metadata symbols they still reference by marking them in use;
//! such a symbol still dies with its region.

use rustc_hash::FxHashSet;

use crate::features::symbolic::domain::{Region, Symbol};

#[derive(Debug, Default)]
pub struct SymbolReaper {
    dead_symbols: FxHashSet<Symbol>,
    dead_regions: FxHashSet<Region>,
    in_use: FxHashSet<Symbol>,
}

impl SymbolReaper {
    pub fn new(dead_symbols: &[Symbol], dead_regions: &[Region]) -> Self {
        Self {
            dead_symbols: dead_symbols.iter().cloned().collect(),
            dead_regions: dead_regions.iter().cloned().collect(),
            in_use: FxHashSet::default(),
        }
    }

    pub fn mark_in_use(&mut self, symbol: &Symbol) {
        self.in_use.insert(symbol.clone());
    }

    pub fn is_marked_in_use(&self, symbol: &Symbol) -> bool {
        self.in_use.contains(symbol)
    }

    fn is_region_dead(&self, region: &Region) -> bool {
        self.dead_regions.contains(region)
            || region.ancestors().any(|ancestor| self.dead_regions.contains(ancestor))
    }

    pub fn is_dead(&self, symbol: &Symbol) -> bool {
        match symbol.metadata_region() {
            Some(region) => {
                self.is_region_dead(region)
                    || (self.dead_symbols.contains(symbol) && !self.in_use.contains(symbol))
            }
            None => self.dead_symbols.contains(symbol),
        }
    }
}
