//! Persistent program state
//!
//! Every update returns a new version; older versions stay valid for the
//! sibling paths that still reference them. All maps are `im::OrdMap`, so
//! cloning a state is O(1).

use im::OrdMap;
use tracing::trace;

use super::sval_builder::SValBuilder;
use crate::features::symbolic::domain::{
    BinaryOp, RangeSet, Region, RegionKind, SVal, SymExpr, Symbol,
};
use crate::shared::models::{CType, ExprId};

/// Per-checker map from region to value
pub type RegionValueMap = OrdMap<Region, SVal>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramState {
    bindings: OrdMap<Region, SVal>,
    /// Conjured contents of invalidated clusters
    default_bindings: OrdMap<Region, Symbol>,
    extents: OrdMap<Region, SVal>,
    expr_values: OrdMap<ExprId, SVal>,
    pub(super) constraints: OrdMap<SymExpr, RangeSet>,
    checker_maps: OrdMap<&'static str, RegionValueMap>,
}

/// How `invalidate_regions` treats individual regions
#[derive(Debug, Clone, Default)]
pub struct InvalidationTraits {
    preserve_contents: Vec<Region>,
}

impl InvalidationTraits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the contents of `region` (and its cluster) intact
    pub fn preserve_contents(mut self, region: Region) -> Self {
        self.preserve_contents.push(region);
        self
    }

    fn preserves(&self, region: &Region) -> bool {
        self.preserve_contents
            .iter()
            .any(|kept| kept == region || kept == region.base_region())
    }
}

impl ProgramState {
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════
    // Store
    // ═══════════════════════════════════════════════════════════════

    pub fn bind(&self, region: Region, value: SVal) -> Self {
        let mut next = self.clone();
        next.bindings.insert(region, value);
        next
    }

    pub fn kill_binding(&self, region: &Region) -> Self {
        let mut next = self.clone();
        next.bindings.remove(region);
        next
    }

    /// Store `bytes` plus a terminating NUL as the contents of `region`
    pub fn bind_string_contents(&self, region: &Region, bytes: &[u8]) -> Self {
        let mut next = self.clone();
        for (idx, byte) in bytes.iter().chain(std::iter::once(&0u8)).enumerate() {
            let element = Region::element(region, CType::Char, SVal::Int(idx as i128));
            next.bindings.insert(element, SVal::Int(*byte as i8 as i128));
        }
        next
    }

    /// Value stored at `region`
    pub fn get_sval(&self, region: &Region) -> SVal {
        if let Some(value) = self.bindings.get(region) {
            return value.clone();
        }

        if let RegionKind::Element { index, parent, .. } = region.kind() {
            if let Some(bytes) = parent.literal_bytes() {
                return match index.as_int() {
                    Some(idx) if idx >= 0 && idx <= bytes.len() as i128 => SVal::Int(
                        bytes
                            .get(idx as usize)
                            .map(|byte| *byte as i8 as i128)
                            .unwrap_or(0),
                    ),
                    _ => SVal::Unknown,
                };
            }
        }

        let ty = region.value_type().unwrap_or(CType::Char);
        let mut enclosing = Some(region);
        while let Some(current) = enclosing {
            if let Some(default) = self.default_bindings.get(current) {
                return symbol_value(Symbol::derived(default, region.clone(), ty));
            }
            enclosing = current.parent();
        }

        match region.base_region().kind() {
            RegionKind::StringLiteral { .. }
            | RegionKind::FunctionCode { .. }
            | RegionKind::BlockCode
            | RegionKind::BlockData => SVal::Unknown,
            _ if region.starts_undefined() => SVal::Undefined,
            _ => symbol_value(Symbol::region_value(region.clone(), ty)),
        }
    }

    pub fn bind_expr(&self, expr: ExprId, value: SVal) -> Self {
        let mut next = self.clone();
        next.expr_values.insert(expr, value);
        next
    }

    pub fn get_expr(&self, expr: ExprId) -> SVal {
        self.expr_values
            .get(&expr)
            .cloned()
            .unwrap_or(SVal::Unknown)
    }

    // ═══════════════════════════════════════════════════════════════
    // Extents
    // ═══════════════════════════════════════════════════════════════

    pub fn set_extent(&self, region: Region, size: SVal) -> Self {
        let mut next = self.clone();
        next.extents.insert(region, size);
        next
    }

    /// Size of `region` in bytes
    pub fn dynamic_extent(&self, region: &Region) -> SVal {
        if let Some(size) = self.extents.get(region) {
            return size.clone();
        }
        match region.kind() {
            RegionKind::Symbolic { .. }
            | RegionKind::Heap { .. }
            | RegionKind::FunctionCode { .. }
            | RegionKind::BlockCode
            | RegionKind::BlockData => SVal::Unknown,
            _ => region
                .value_type()
                .and_then(|ty| ty.size_in_bytes())
                .map(|size| SVal::Int(size as i128))
                .unwrap_or(SVal::Unknown),
        }
    }

    /// Number of `element_ty` elements fitting in `region`
    pub fn element_count(&self, region: &Region, element_ty: &CType) -> SVal {
        let extent = self.dynamic_extent(region);
        match element_ty.size_in_bytes() {
            Some(size) if size > 0 => SValBuilder::fold_binop(
                self,
                BinaryOp::Div,
                &extent,
                &SVal::Int(size as i128),
            ),
            _ => SVal::Unknown,
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // Invalidation
    // ═══════════════════════════════════════════════════════════════

    /// Forget the contents of `regions` after an unmodeled write.
    ///
    /// Invalidating a region clobbers its whole base cluster. Returns the
    /// new state and every region whose contents changed.
    pub fn invalidate_regions(
        &self,
        regions: &[Region],
        traits: &InvalidationTraits,
        svals: &SValBuilder,
    ) -> (Self, Vec<Region>) {
        let mut next = self.clone();
        let mut changed: Vec<Region> = Vec::new();

        for region in regions {
            if traits.preserves(region) {
                trace!("invalidation: preserving contents of {}", region);
                continue;
            }
            let cluster = region.base_region().clone();
            let stale: Vec<Region> = next
                .bindings
                .keys()
                .filter(|bound| *bound == &cluster || bound.is_sub_region_of(&cluster))
                .cloned()
                .collect();
            for bound in &stale {
                next.bindings.remove(bound);
            }
            let stale_defaults: Vec<Region> = next
                .default_bindings
                .keys()
                .filter(|bound| bound.is_sub_region_of(&cluster))
                .cloned()
                .collect();
            for bound in &stale_defaults {
                next.default_bindings.remove(bound);
            }
            let contents = svals.conjure_symbol("invalidated", CType::Char);
            next.default_bindings.insert(cluster.clone(), contents);

            trace!("invalidation: clobbered cluster {}", cluster);
            for touched in [region.clone(), cluster] {
                if !changed.contains(&touched) {
                    changed.push(touched);
                }
            }
        }
        (next, changed)
    }

    // ═══════════════════════════════════════════════════════════════
    // Per-checker maps
    // ═══════════════════════════════════════════════════════════════

    pub fn region_map(&self, key: &'static str) -> RegionValueMap {
        self.checker_maps.get(&key).cloned().unwrap_or_default()
    }

    pub fn set_region_map(&self, key: &'static str, map: RegionValueMap) -> Self {
        let mut next = self.clone();
        if map.is_empty() {
            next.checker_maps.remove(&key);
        } else {
            next.checker_maps.insert(key, map);
        }
        next
    }
}

/// Pointer-typed symbols denote the storage they point to
fn symbol_value(symbol: Symbol) -> SVal {
    if symbol.ty().is_pointer() {
        SVal::region(Region::symbolic(symbol))
    } else {
        SVal::symbol(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_buf(len: u64) -> Region {
        Region::var(1, "buf", CType::array(CType::Char, len))
    }

    #[test]
    fn test_uninitialized_local_reads_undefined() {
        let state = ProgramState::new();
        let elem = Region::element(&local_buf(4), CType::Char, SVal::Int(1));
        assert!(state.get_sval(&elem).is_undef());
    }

    #[test]
    fn test_param_contents_are_region_value_symbols() {
        let state = ProgramState::new();
        let param = Region::param(2, "p", CType::Int);
        assert!(state.get_sval(&param).as_symbol().is_some());
    }

    #[test]
    fn test_pointer_contents_are_symbolic_regions() {
        let state = ProgramState::new();
        let stringp = Region::param(3, "stringp", CType::pointer(CType::char_ptr()));
        let slot = Region::element(&stringp, CType::char_ptr(), SVal::Int(0));
        let region = state.get_sval(&slot).as_region().cloned().unwrap();
        assert!(region.symbolic_base().is_some());
    }

    #[test]
    fn test_literal_elements_read_bytes() {
        let state = ProgramState::new();
        let lit = Region::string_literal(1, "ab");
        let at = |i| state.get_sval(&Region::element(&lit, CType::Char, SVal::Int(i)));
        assert_eq!(at(0), SVal::Int(b'a' as i128));
        assert_eq!(at(2), SVal::Int(0));
        assert_eq!(at(5), SVal::Unknown);
    }

    #[test]
    fn test_extent_and_element_count() {
        let state = ProgramState::new();
        let ints = Region::var(3, "v", CType::array(CType::Int, 6));
        assert_eq!(state.dynamic_extent(&ints), SVal::Int(24));
        assert_eq!(state.element_count(&ints, &CType::Int), SVal::Int(6));
        let lit = Region::string_literal(1, "abcd");
        assert_eq!(state.dynamic_extent(&lit), SVal::Int(5));
    }

    #[test]
    fn test_invalidation_clobbers_cluster_and_reports_changes() {
        let svals = SValBuilder::new();
        let record = Region::var(
            4,
            "s",
            CType::Record {
                name: "pair".into(),
                size: 16,
            },
        );
        let field = Region::field(&record, "name", CType::array(CType::Char, 8));
        let state = ProgramState::new().bind_string_contents(&field, b"hi");
        let (next, changed) =
            state.invalidate_regions(&[field.clone()], &InvalidationTraits::new(), &svals);
        assert_eq!(changed, vec![field.clone(), record]);
        let first = Region::element(&field, CType::Char, SVal::Int(0));
        assert_eq!(state.get_sval(&first), SVal::Int(b'h' as i128));
        assert!(next.get_sval(&first).as_symbol().is_some());
    }

    #[test]
    fn test_preserved_regions_are_untouched() {
        let svals = SValBuilder::new();
        let buf = local_buf(4);
        let state = ProgramState::new().bind_string_contents(&buf, b"x");
        let traits = InvalidationTraits::new().preserve_contents(buf.clone());
        let (next, changed) = state.invalidate_regions(&[buf], &traits, &svals);
        assert!(changed.is_empty());
        assert_eq!(next, state);
    }

    #[test]
    fn test_region_maps_are_versioned() {
        let key = "test.map";
        let buf = local_buf(4);
        let before = ProgramState::new();
        let mut map = before.region_map(key);
        map.insert(buf.clone(), SVal::Int(3));
        let after = before.set_region_map(key, map);
        assert!(before.region_map(key).is_empty());
        assert_eq!(after.region_map(key).get(&buf), Some(&SVal::Int(3)));
    }
}
