//! C string bounds scenarios (MISRA C:2012 Rule 21.17)
//!
//! Each test drives the registry-built manager the way the path explorer
//! would: declaration hooks, modeled calls, unmodeled writes.

mod common;

use common::*;
use pretty_assertions::assert_eq;

use bounds_engine::features::checker_api::{DeclStmt, Initializer, VarDecl};
use bounds_engine::features::cstring_bounds::{recorded_length, select_amount_copied};
use bounds_engine::features::symbolic::{BinaryOp, ProgramState, Region, SVal, SValBuilder};
use bounds_engine::shared::models::{CType, DiagnosticCategory, ExprId, Span};

/// `char name[len] = "text";` with the host binding the contents
fn declare_initialized(
    manager: &mut bounds_engine::CheckerManager,
    region: &Region,
    len: u64,
    text: &str,
) -> ProgramState {
    let decl = DeclStmt::single(
        VarDecl {
            name: "buf".to_string(),
            ty: CType::array(CType::Char, len),
            region: region.clone(),
            init: Some(Initializer::StringLiteral {
                expr: ExprId(900),
                value: literal(90, text),
            }),
        },
        Span::line(1, 4, 30),
    );
    let state = ProgramState::new().bind_string_contents(region, text.as_bytes());
    let mut successors = manager.run_pre_stmt(&decl, state);
    assert_eq!(successors.len(), 1);
    successors.remove(0)
}

#[test]
fn test_strcpy_literal_into_exact_size_buffer_overflows() {
    let mut manager = full_manager();
    let dst = char_buffer(1, "dst", 4);
    let call = CallBuilder::new(2, "strcpy")
        .at(Span::line(2, 5, 22))
        .ptr(decay(&dst))
        .ptr(literal(1, "abcd"))
        .build();

    let result = manager.run_eval_call(&call, ProgramState::new());
    assert!(result.handled);
    assert!(result.successors.is_empty());
    let report = assert_single_diagnostic(&manager, DiagnosticCategory::BufferOverflowWrite);
    assert_eq!(report.checker, "misrac-2012-21.17");
    assert_eq!(report.message, "String copy function overflows the destination buffer");
    assert_eq!(report.span, Span::line(2, 5, 22));
}

#[test]
fn test_strncpy_with_safe_bound_is_silent_and_forgets_length() {
    let mut manager = full_manager();
    let dst = char_buffer(1, "dst", 8);
    let src = unknown_string(manager.svals(), "src");
    let call = CallBuilder::new(2, "strncpy")
        .ptr(decay(&dst))
        .ptr(src)
        .size(SVal::Int(4))
        .build();

    let result = manager.run_eval_call(&call, ProgramState::new());
    assert!(result.handled);
    assert_no_diagnostics(&manager);
    assert_eq!(result.successors.len(), 1);
    assert_eq!(recorded_length(&result.successors[0], &dst), None);
    assert_eq!(result.successors[0].get_expr(ExprId(2)), decay(&dst));
}

#[test]
fn test_length_lookup_is_stable_along_a_path() {
    let mut manager = cstring_manager();
    let s = unknown_string(manager.svals(), "s");

    let first = CallBuilder::new(1, "strlen").ptr(s.clone()).build();
    let state = manager.run_eval_call(&first, ProgramState::new()).successors.remove(0);
    let second = CallBuilder::new(2, "strlen").ptr(s).build();
    let state = manager.run_eval_call(&second, state).successors.remove(0);

    let len = state.get_expr(ExprId(1));
    assert!(len.as_symbol().is_some(), "expected a symbolic length, got {len}");
    assert_eq!(len, state.get_expr(ExprId(2)));
    assert_no_diagnostics(&manager);
}

#[test]
fn test_write_to_enclosing_object_discards_length() {
    let mut manager = cstring_manager();
    let record = Region::var(1, "msg", CType::Record { name: "message".into(), size: 32 });
    let name = Region::field(&record, "name", CType::array(CType::Char, 16));
    let name_ptr = SVal::region(Region::element(&name, CType::Char, SVal::Int(0)));

    let copy = CallBuilder::new(2, "strcpy")
        .ptr(name_ptr.clone())
        .ptr(literal(1, "abc"))
        .build();
    let state = manager.run_eval_call(&copy, ProgramState::new()).successors.remove(0);
    assert_eq!(recorded_length(&state, &name), Some(SVal::Int(3)));

    // Escapes to an unknown call: the whole record may have changed
    let state = manager.invalidate(state, &[record]);
    assert_eq!(recorded_length(&state, &name), None);

    let strlen = CallBuilder::new(3, "strlen").ptr(name_ptr).build();
    let state = manager.run_eval_call(&strlen, state).successors.remove(0);
    let len = state.get_expr(ExprId(3));
    assert_ne!(len, SVal::Int(3));
    assert!(len.as_symbol().is_some());
    assert_no_diagnostics(&manager);
}

#[test]
fn test_direct_store_into_buffer_discards_length() {
    let mut manager = cstring_manager();
    let dst = char_buffer(1, "dst", 8);
    let state = declare_initialized(&mut manager, &dst, 8, "hello");
    assert_eq!(recorded_length(&state, &dst), Some(SVal::Int(5)));

    let third = Region::element(&dst, CType::Char, SVal::Int(2));
    let state = manager.bind(state, third, SVal::Int(0));
    assert_eq!(recorded_length(&state, &dst), None);
}

#[test]
fn test_declared_literal_feeds_strlen() {
    let mut manager = cstring_manager();
    let greeting = char_buffer(1, "greeting", 16);
    let state = declare_initialized(&mut manager, &greeting, 16, "hi there");

    let call = CallBuilder::new(2, "strlen").ptr(decay(&greeting)).build();
    let result = manager.run_eval_call(&call, state);
    assert_eq!(result.successors[0].get_expr(ExprId(2)), SVal::Int(8));
}

#[test]
fn test_null_argument_is_reported_once_and_stops_the_call() {
    let mut manager = full_manager();
    let dst = char_buffer(1, "dst", 8);
    let call = CallBuilder::new(2, "strcpy")
        .ptr(decay(&dst))
        .ptr(SVal::null())
        .build();

    let result = manager.run_eval_call(&call, ProgramState::new());
    assert!(result.handled);
    assert!(result.successors.is_empty());
    let report = assert_single_diagnostic(&manager, DiagnosticCategory::NullArgument);
    assert_eq!(
        report.message,
        "Null pointer passed as 2nd argument to string copy function"
    );

    // Same path reaching the call again does not duplicate the finding
    manager.run_eval_call(&call, ProgramState::new());
    assert_category_count(&manager, DiagnosticCategory::NullArgument, 1);
}

#[test]
fn test_pointer_known_to_be_null_on_this_path() {
    let mut manager = cstring_manager();
    let p = unknown_string(manager.svals(), "p");
    let is_null = manager
        .svals()
        .eval_eq(&ProgramState::new(), &p, &SVal::null());
    let state = ProgramState::new()
        .assume(&is_null, true)
        .expect("a symbolic pointer admits the null branch");

    let call = CallBuilder::new(1, "strlen").ptr(p).build();
    let result = manager.run_eval_call(&call, state);
    assert!(result.successors.is_empty());
    assert_single_diagnostic(&manager, DiagnosticCategory::NullArgument);
}

#[test]
fn test_comparing_a_string_with_itself_yields_zero() {
    let mut manager = cstring_manager();
    let s = unknown_string(manager.svals(), "s");

    for (expr, callee) in [(1, "strcmp"), (2, "strcasecmp")] {
        let call = CallBuilder::new(expr, callee).ptr(s.clone()).ptr(s.clone()).build();
        let result = manager.run_eval_call(&call, ProgramState::new());
        assert_eq!(result.successors.len(), 1, "{callee}");
        assert_eq!(result.successors[0].get_expr(ExprId(expr)), SVal::Int(0));
    }
    assert_no_diagnostics(&manager);
}

#[test]
fn test_literal_comparison_is_evaluated() {
    let mut manager = cstring_manager();
    let call = CallBuilder::new(1, "strncmp")
        .ptr(literal(1, "apple"))
        .ptr(literal(2, "apricot"))
        .size(SVal::Int(2))
        .build();
    let result = manager.run_eval_call(&call, ProgramState::new());
    assert_eq!(result.successors[0].get_expr(ExprId(1)), SVal::Int(0));

    let call = CallBuilder::new(2, "strcmp")
        .ptr(literal(1, "apple"))
        .ptr(literal(2, "apricot"))
        .build();
    let result = manager.run_eval_call(&call, ProgramState::new());
    let ordering = result.successors[0].get_expr(ExprId(2));
    assert!(ordering.as_int().is_some_and(|value| value < 0), "got {ordering}");
}

#[test]
fn test_bounded_copy_amount_is_only_decided_when_provable() {
    let svals = SValBuilder::new();
    let state = ProgramState::new();
    let src_len = svals.conjure_sval("src_len", CType::SizeT);
    let bound = SVal::Int(6);

    let long = svals.eval_binop(&state, BinaryOp::Ge, &src_len, &SVal::Int(6));
    let long_state = state.assume(&long, true).expect("feasible");
    assert_eq!(select_amount_copied(&long_state, &src_len, &bound).0, bound);

    let short = svals.eval_binop(&state, BinaryOp::Lt, &src_len, &SVal::Int(6));
    let short_state = state.assume(&short, true).expect("feasible");
    assert_eq!(select_amount_copied(&short_state, &src_len, &bound).0, src_len);

    let (amount, undecided) = select_amount_copied(&state, &src_len, &bound);
    assert!(amount.is_unknown(), "amount must not be guessed, got {amount}");
    assert_eq!(undecided, state);
}

#[test]
fn test_strncat_bound_beyond_free_space() {
    let mut manager = cstring_manager();
    let dst = char_buffer(1, "dst", 8);
    let state = declare_initialized(&mut manager, &dst, 8, "abc");
    let src = unknown_string(manager.svals(), "src");

    let safe = CallBuilder::new(2, "strncat")
        .ptr(decay(&dst))
        .ptr(src.clone())
        .size(SVal::Int(4))
        .build();
    let result = manager.run_eval_call(&safe, state.clone());
    assert_eq!(result.successors.len(), 1);
    assert_no_diagnostics(&manager);

    let unsafe_bound = CallBuilder::new(3, "strncat")
        .ptr(decay(&dst))
        .ptr(src)
        .size(SVal::Int(6))
        .build();
    let result = manager.run_eval_call(&unsafe_bound, state);
    assert!(result.successors.is_empty());
    let report = assert_single_diagnostic(&manager, DiagnosticCategory::BufferOverflowWrite);
    assert_eq!(
        report.message,
        "Size argument is greater than the free space in the destination buffer"
    );
}

#[test]
fn test_unterminated_buffer_is_not_a_c_string() {
    let mut manager = cstring_manager();
    let raw = char_buffer(1, "raw", 3);
    let mut state = ProgramState::new();
    for idx in 0..3 {
        let byte = Region::element(&raw, CType::Char, SVal::Int(idx));
        state = state.bind(byte, SVal::Int(i128::from(b'z')));
    }

    let call = CallBuilder::new(2, "strlen").ptr(decay(&raw)).build();
    let result = manager.run_eval_call(&call, state);
    let report = assert_single_diagnostic(&manager, DiagnosticCategory::NotCString);
    assert_eq!(
        report.message,
        "Argument to string length function is not a null-terminated string within its buffer"
    );
    // Non-fatal: the path continues
    assert_eq!(result.successors.len(), 1);
}

#[test]
fn test_strtok_invalidates_its_input() {
    let mut manager = cstring_manager();
    let line = char_buffer(1, "line", 32);
    let state = declare_initialized(&mut manager, &line, 32, "a,b,c");

    let call = CallBuilder::new(2, "strtok")
        .ptr(decay(&line))
        .ptr(literal(3, ","))
        .build();
    let result = manager.run_eval_call(&call, state);
    assert_no_diagnostics(&manager);
    let state = &result.successors[0];
    assert_eq!(recorded_length(state, &line), None);
    assert!(state.get_expr(ExprId(2)).is_loc());
}

#[test]
fn test_uncatalogued_calls_fall_through() {
    let mut manager = full_manager();
    let call = CallBuilder::new(1, "my_strlen")
        .ptr(literal(1, "abc"))
        .build();
    let result = manager.run_eval_call(&call, ProgramState::new());
    assert!(!result.handled);
    assert_eq!(result.successors, vec![ProgramState::new()]);
}

#[test]
fn test_truncating_strlcpy_returns_source_length() {
    let mut manager = cstring_manager();
    let dst = char_buffer(1, "dst", 4);
    let call = CallBuilder::new(2, "strlcpy")
        .ptr(decay(&dst))
        .ptr(literal(1, "hello"))
        .size(SVal::Int(4))
        .build();

    let result = manager.run_eval_call(&call, ProgramState::new());
    assert_no_diagnostics(&manager);
    assert_eq!(result.successors.len(), 1);
    assert_eq!(result.successors[0].get_expr(ExprId(2)), SVal::Int(5));
}

#[test]
fn test_strlcat_returns_both_lengths() {
    let mut manager = cstring_manager();
    let dst = char_buffer(1, "dst", 16);
    let state = declare_initialized(&mut manager, &dst, 16, "ab");
    let call = CallBuilder::new(2, "strlcat")
        .ptr(decay(&dst))
        .ptr(literal(1, "xyz"))
        .size(SVal::Int(16))
        .build();

    let result = manager.run_eval_call(&call, state);
    assert_no_diagnostics(&manager);
    let state = &result.successors[0];
    assert_eq!(state.get_expr(ExprId(2)), SVal::Int(5));
    assert_eq!(recorded_length(state, &dst), Some(SVal::Int(5)));
}

#[test]
fn test_strlcat_with_undecided_amount() {
    let mut manager = cstring_manager();
    let dst = char_buffer(1, "dst", 16);
    let state = declare_initialized(&mut manager, &dst, 16, "ab");
    let src = unknown_string(manager.svals(), "src");
    let src_region = src.as_region().cloned().expect("symbolic source");
    let call = CallBuilder::new(2, "strlcat")
        .ptr(decay(&dst))
        .ptr(src)
        .size(SVal::Int(16))
        .build();

    let result = manager.run_eval_call(&call, state);
    assert_no_diagnostics(&manager);
    let state = &result.successors[0];

    // Returns strlen(src) + strlen(dst) even when the amount is unknown
    let src_len = recorded_length(state, &src_region).expect("source length recorded");
    let expected = manager
        .svals()
        .eval_binop(state, BinaryOp::Add, &src_len, &SVal::Int(2));
    assert_eq!(state.get_expr(ExprId(2)), expected);

    // New destination length is unknown but never shorter than before
    let dst_len = recorded_length(state, &dst).expect("destination length recorded");
    assert!(dst_len.as_symbol().is_some(), "got {dst_len}");
    let shrunk = manager
        .svals()
        .eval_binop(state, BinaryOp::Lt, &dst_len, &SVal::Int(2));
    assert!(state.assume(&shrunk, true).is_none());
}

#[test]
fn test_bounded_concat_keeps_destination_length_as_lower_bound() {
    let mut manager = cstring_manager();
    let dst = char_buffer(1, "dst", 16);
    let state = declare_initialized(&mut manager, &dst, 16, "abc");
    let src = unknown_string(manager.svals(), "src");
    let call = CallBuilder::new(2, "strncat")
        .ptr(decay(&dst))
        .ptr(src)
        .size(SVal::Int(4))
        .build();

    let result = manager.run_eval_call(&call, state);
    assert_no_diagnostics(&manager);
    let state = &result.successors[0];
    let dst_len = recorded_length(state, &dst).expect("destination length recorded");
    assert_ne!(dst_len, SVal::Int(3));
    let shrunk = manager
        .svals()
        .eval_binop(state, BinaryOp::Lt, &dst_len, &SVal::Int(3));
    assert!(state.assume(&shrunk, true).is_none());
    let may_grow = manager
        .svals()
        .eval_binop(state, BinaryOp::Gt, &dst_len, &SVal::Int(3));
    assert!(state.assume(&may_grow, true).is_some());
}

#[test]
fn test_liveness_sweep_through_manager() {
    let mut manager = full_manager();
    let s = unknown_string(manager.svals(), "s");
    let s_region = s.as_region().cloned().expect("symbolic string");

    let strlen = CallBuilder::new(1, "strlen").ptr(s.clone()).build();
    let state = manager.run_eval_call(&strlen, ProgramState::new()).successors.remove(0);
    let length = recorded_length(&state, &s_region).expect("length recorded");

    // Appending a literal leaves a compound length: old length + 3
    let strcat = CallBuilder::new(2, "strcat").ptr(s).ptr(literal(1, "abc")).build();
    let state = manager.run_eval_call(&strcat, state).successors.remove(0);
    let appended = recorded_length(&state, &s_region).expect("length recorded");
    assert!(appended.as_symbol().is_none(), "expected a compound length, got {appended}");
    assert_eq!(appended.symbols(), length.symbols());

    // The checker still references the length: it survives the sweep
    let mut swept = manager.run_dead_symbols(state.clone(), &length.symbols(), &[]);
    assert_eq!(swept.len(), 1);
    assert_eq!(recorded_length(&swept.remove(0), &s_region), Some(appended));

    // Once the string's storage is dead the fact goes with it
    let mut swept = manager.run_dead_symbols(state, &length.symbols(), &[s_region.clone()]);
    assert_eq!(recorded_length(&swept.remove(0), &s_region), None);
    assert_no_diagnostics(&manager);
}
