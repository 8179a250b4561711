//! Static function effect table
//!
//! One row per known C library function. Read/write positions follow the
//! library contracts; `strings` lists positions expected to hold
//! null-terminated strings. String-library rows additionally carry the
//! [`StringModel`] the bounds checker dispatches on.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::features::function_effects::domain::{
    ArgSet, Arity, ConcatKind, FunctionEffect, SearchKind, StringFamily, StringModel,
};

const fn of(discrete: &'static [usize]) -> ArgSet {
    ArgSet::of(discrete)
}

const fn var(discrete: &'static [usize], from: usize) -> ArgSet {
    ArgSet::variadic(discrete, from)
}

const NONE: ArgSet = ArgSet::EMPTY;

const fn entry(
    name: &'static str,
    arity: Arity,
    reads: ArgSet,
    writes: ArgSet,
    strings: ArgSet,
) -> FunctionEffect {
    FunctionEffect {
        name,
        arity,
        reads,
        writes,
        string_reads: strings,
        string_model: None,
    }
}

const fn modeled(
    effect: FunctionEffect,
    family: StringFamily,
    destination: Option<usize>,
    sources: &'static [usize],
    bound: Option<usize>,
) -> FunctionEffect {
    FunctionEffect {
        string_model: Some(StringModel {
            family,
            destination,
            sources,
            bound,
        }),
        ..effect
    }
}

const fn n(arity: usize) -> Arity {
    Arity::Exact(arity)
}

const ANY: Arity = Arity::Any;

const COPY: StringFamily = StringFamily::Copy {
    returns_end: false,
    returns_ptr: true,
};
const STPCPY: StringFamily = StringFamily::Copy {
    returns_end: true,
    returns_ptr: true,
};
const STRLCPY: StringFamily = StringFamily::Copy {
    returns_end: false,
    returns_ptr: false,
};
const STRCAT: StringFamily = StringFamily::Concat {
    kind: ConcatKind::Strcat,
    returns_ptr: true,
};
const STRLCAT: StringFamily = StringFamily::Concat {
    kind: ConcatKind::Strlcat,
    returns_ptr: false,
};
const COMPARE: StringFamily = StringFamily::Compare { ignore_case: false };
const CASE_COMPARE: StringFamily = StringFamily::Compare { ignore_case: true };

#[rustfmt::skip]
static FUNCTION_EFFECTS: &[FunctionEffect] = &[
    // ═══════════════════════════════════════════════════════════════
    // stdlib / stdio
    // ═══════════════════════════════════════════════════════════════
    entry("atof", n(1), of(&[0]), NONE, NONE),
    entry("atoi", n(1), of(&[0]), NONE, NONE),
    entry("atol", n(1), of(&[0]), NONE, NONE),
    entry("clearerr", n(1), of(&[0]), of(&[0]), NONE),
    entry("fclose", n(1), of(&[0]), of(&[0]), NONE),
    entry("fdopen", n(2), of(&[1]), NONE, of(&[1])),
    entry("feof", n(1), of(&[0]), of(&[0]), NONE),
    entry("ferror", n(1), of(&[0]), of(&[0]), NONE),
    entry("fflush", n(1), of(&[0]), of(&[0]), NONE),
    entry("fgetc", n(1), of(&[0]), of(&[0]), NONE),
    entry("fgetpos", n(2), of(&[0]), of(&[0, 1]), NONE),
    entry("fgets", n(3), of(&[2]), of(&[0, 2]), NONE),
    entry("fileno", n(1), of(&[0]), of(&[0]), NONE),
    entry("fopen", n(2), of(&[0, 1]), NONE, of(&[0, 1])),
    entry("fprintf", ANY, var(&[0, 1], 2), of(&[0]), var(&[1], 2)),
    entry("fputc", n(2), of(&[1]), of(&[1]), NONE),
    entry("fputs", n(2), of(&[0, 1]), of(&[1]), of(&[0])),
    entry("fread", n(4), of(&[3]), of(&[0, 3]), NONE),
    entry("free", n(1), of(&[0]), of(&[0]), NONE),
    entry("freopen", n(3), of(&[0, 1, 2]), of(&[2]), of(&[0, 1])),
    entry("fscanf", ANY, of(&[0, 1]), var(&[0], 2), var(&[1], 2)),
    entry("fseek", n(3), of(&[0]), of(&[0]), NONE),
    entry("fsetpos", n(2), of(&[0, 1]), of(&[0]), of(&[1])),
    entry("ftell", n(1), of(&[0]), of(&[0]), NONE),
    entry("fwrite", n(4), of(&[0, 3]), of(&[3]), of(&[0])),
    entry("getc", n(1), of(&[0]), of(&[0]), NONE),
    entry("getchar", n(0), NONE, NONE, NONE),
    entry("gets", n(1), NONE, of(&[0]), NONE),
    entry("perror", n(1), of(&[0]), NONE, of(&[0])),
    entry("printf", ANY, var(&[0], 1), NONE, var(&[0], 1)),
    entry("putc", n(2), of(&[1]), of(&[1]), NONE),
    entry("putchar", n(1), NONE, NONE, NONE),
    entry("puts", n(1), of(&[0]), NONE, of(&[0])),
    entry("qsort", n(4), of(&[0, 3]), of(&[0]), NONE),
    entry("read", n(3), NONE, of(&[1]), NONE),
    entry("realloc", n(2), of(&[0]), of(&[0]), NONE),
    entry("remove", n(1), of(&[0]), NONE, of(&[0])),
    entry("rename", n(2), of(&[0, 1]), NONE, of(&[0, 1])),
    entry("rewind", n(1), of(&[0]), of(&[0]), NONE),
    entry("scanf", ANY, of(&[0]), var(&[], 1), var(&[0], 1)),
    entry("setbuf", n(2), of(&[0]), of(&[0, 1]), NONE),
    entry("setvbuf", n(4), of(&[0]), of(&[0, 1]), NONE),
    entry("signal", n(2), of(&[1]), NONE, NONE),
    entry("snprintf", ANY, var(&[2], 3), of(&[0]), var(&[2], 3)),
    entry("sprintf", ANY, var(&[1], 2), of(&[0]), var(&[1], 2)),
    entry("sscanf", ANY, of(&[0, 1]), var(&[], 2), var(&[0, 1], 2)),
    entry("time", n(1), of(&[0]), of(&[0]), NONE),
    entry("time64", n(1), of(&[0]), of(&[0]), NONE),
    entry("tmpfile", n(0), NONE, NONE, NONE),
    entry("tmpnam", n(1), NONE, of(&[0]), NONE),
    entry("ungetc", n(2), of(&[0, 1]), of(&[1]), NONE),
    entry("vfprintf", n(3), of(&[0, 1, 2]), of(&[0, 2]), of(&[1])),
    entry("vfscanf", n(3), of(&[0, 1, 2]), of(&[0, 2]), of(&[1])),
    entry("vfwscanf", n(3), of(&[0, 1, 2]), of(&[0, 2]), of(&[1])),
    entry("vprintf", n(2), of(&[0, 1]), of(&[1]), of(&[0])),
    entry("vscanf", n(2), of(&[0, 1]), of(&[1]), of(&[0])),
    entry("vsnprintf", n(4), of(&[2, 3]), of(&[0, 3]), of(&[1])),
    entry("vsprintf", n(3), of(&[1, 2]), of(&[0, 2]), of(&[1])),
    entry("vsscanf", n(3), of(&[0, 1, 2]), of(&[2]), of(&[0, 1])),
    entry("write", n(3), of(&[1]), NONE, NONE),

    // ═══════════════════════════════════════════════════════════════
    // string.h: memory
    // ═══════════════════════════════════════════════════════════════
    entry("memchr", n(3), of(&[0]), NONE, of(&[0])),
    entry("memcmp", n(3), of(&[0, 1]), NONE, of(&[0, 1])),
    entry("memcpy", n(3), of(&[1]), of(&[0]), of(&[1])),
    entry("memmove", n(3), of(&[1]), of(&[0]), of(&[1])),
    entry("memset", n(3), NONE, of(&[0]), NONE),
    entry("strerror", n(1), NONE, NONE, NONE),
    entry("strtok_r", n(3), of(&[0, 1, 2]), of(&[0, 2]), of(&[0, 1, 2])),
    entry("strxfrm", n(3), of(&[1]), of(&[0]), of(&[1])),

    // ═══════════════════════════════════════════════════════════════
    // string.h: modeled string functions
    // ═══════════════════════════════════════════════════════════════
    modeled(entry("strlen", n(1), of(&[0]), NONE, of(&[0])), StringFamily::Length, None, &[0], None),
    modeled(entry("strnlen", n(2), of(&[0]), NONE, of(&[0])), StringFamily::Length, None, &[0], Some(1)),
    modeled(entry("strcpy", n(2), of(&[1]), of(&[0]), of(&[1])), COPY, Some(0), &[1], None),
    modeled(entry("strncpy", n(3), of(&[1]), of(&[0]), of(&[1])), COPY, Some(0), &[1], Some(2)),
    modeled(entry("stpcpy", n(2), of(&[1]), of(&[0]), of(&[1])), STPCPY, Some(0), &[1], None),
    modeled(entry("strlcpy", n(3), of(&[1]), of(&[0]), of(&[1])), STRLCPY, Some(0), &[1], Some(2)),
    modeled(entry("strcat", n(2), of(&[0, 1]), of(&[0]), of(&[0, 1])), STRCAT, Some(0), &[1], None),
    modeled(entry("strncat", n(3), of(&[0, 1]), of(&[0]), of(&[0, 1])), STRCAT, Some(0), &[1], Some(2)),
    modeled(entry("strlcat", n(3), of(&[0, 1]), of(&[0]), of(&[0, 1])), STRLCAT, Some(0), &[1], Some(2)),
    modeled(entry("strcmp", n(2), of(&[0, 1]), NONE, of(&[0, 1])), COMPARE, None, &[0, 1], None),
    modeled(entry("strncmp", n(3), of(&[0, 1]), NONE, of(&[0, 1])), COMPARE, None, &[0, 1], Some(2)),
    modeled(entry("strcasecmp", n(2), of(&[0, 1]), NONE, of(&[0, 1])), CASE_COMPARE, None, &[0, 1], None),
    modeled(entry("strncasecmp", n(3), of(&[0, 1]), NONE, of(&[0, 1])), CASE_COMPARE, None, &[0, 1], Some(2)),
    modeled(entry("strcoll", n(2), of(&[0, 1]), NONE, of(&[0, 1])), COMPARE, None, &[0, 1], None),
    modeled(entry("strchr", n(2), of(&[0]), NONE, of(&[0])), StringFamily::Search(SearchKind::Char), None, &[0], None),
    modeled(entry("strrchr", n(2), of(&[0]), NONE, of(&[0])), StringFamily::Search(SearchKind::Char), None, &[0], None),
    modeled(entry("strspn", n(2), of(&[0, 1]), NONE, of(&[0, 1])), StringFamily::Search(SearchKind::Span), None, &[0, 1], None),
    modeled(entry("strcspn", n(2), of(&[0, 1]), NONE, of(&[0, 1])), StringFamily::Search(SearchKind::Span), None, &[0, 1], None),
    modeled(entry("strstr", n(2), of(&[0, 1]), NONE, of(&[0, 1])), StringFamily::Search(SearchKind::Substring), None, &[0, 1], None),
    modeled(entry("strpbrk", n(2), of(&[0, 1]), NONE, of(&[0, 1])), StringFamily::Search(SearchKind::Pbrk), None, &[0, 1], None),
    modeled(entry("strtok", n(2), of(&[0, 1]), of(&[0]), of(&[0, 1])), StringFamily::Tokenize, Some(0), &[1], None),
    modeled(entry("strsep", n(2), of(&[0, 1]), of(&[0]), of(&[1])), StringFamily::Separate, Some(0), &[1], None),
];

static INDEX: Lazy<FxHashMap<&'static str, Vec<&'static FunctionEffect>>> = Lazy::new(|| {
    let mut index: FxHashMap<&'static str, Vec<&'static FunctionEffect>> = FxHashMap::default();
    for effect in FUNCTION_EFFECTS {
        index.entry(effect.name).or_default().push(effect);
    }
    index
});

/// Entry for a call to `name` with `arg_count` arguments
pub fn lookup(name: &str, arg_count: usize) -> Option<&'static FunctionEffect> {
    let name = name.strip_prefix("__builtin_").unwrap_or(name);
    INDEX
        .get(name)?
        .iter()
        .copied()
        .find(|effect| effect.arity.matches(arg_count))
}

/// Every catalogued function
pub fn entries() -> &'static [FunctionEffect] {
    FUNCTION_EFFECTS
}
