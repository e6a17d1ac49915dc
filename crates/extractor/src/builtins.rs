//! Platform names excluded from call-site extraction.
//!
//! A syntactic call cannot tell a user function from a platform one with the
//! same name, so these are dropped outright.

/// Callees excluded when called as a bare identifier
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    // ECMAScript globals
    "console",
    "require",
    "setTimeout",
    "setInterval",
    "setImmediate",
    "clearTimeout",
    "clearInterval",
    "clearImmediate",
    "queueMicrotask",
    "requestAnimationFrame",
    "cancelAnimationFrame",
    "structuredClone",
    "fetch",
    "alert",
    "parseInt",
    "parseFloat",
    "isNaN",
    "isFinite",
    "encodeURI",
    "encodeURIComponent",
    "decodeURI",
    "decodeURIComponent",
    "String",
    "Number",
    "Boolean",
    "Symbol",
    "BigInt",
    "Object",
    "Array",
    "Date",
    "RegExp",
    "Error",
    "TypeError",
    "RangeError",
    "Promise",
    "Map",
    "Set",
    "WeakMap",
    "WeakSet",
    "JSON",
    "Math",
    "Reflect",
    "Proxy",
    "super",
    // Python builtins
    "print",
    "len",
    "range",
    "str",
    "int",
    "float",
    "bool",
    "list",
    "dict",
    "set",
    "tuple",
    "isinstance",
    "issubclass",
    "enumerate",
    "zip",
    "sorted",
    "reversed",
    "open",
    "getattr",
    "setattr",
    "hasattr",
    "type",
    "min",
    "max",
    "sum",
    "abs",
    "repr",
    // Rust prelude constructors
    "Some",
    "Ok",
    "Err",
    "Box",
    "drop",
];

/// Callees excluded when called as a member-access property
pub const BUILTIN_METHODS: &[&str] = &[
    // logging
    "log",
    "info",
    "warn",
    "error",
    "debug",
    "trace",
    // array prototype
    "map",
    "filter",
    "reduce",
    "reduceRight",
    "forEach",
    "find",
    "findIndex",
    "some",
    "every",
    "includes",
    "indexOf",
    "lastIndexOf",
    "push",
    "pop",
    "shift",
    "unshift",
    "slice",
    "splice",
    "concat",
    "join",
    "sort",
    "reverse",
    "flat",
    "flatMap",
    "fill",
    "at",
    // string prototype
    "split",
    "replace",
    "replaceAll",
    "trim",
    "trimStart",
    "trimEnd",
    "toLowerCase",
    "toUpperCase",
    "startsWith",
    "endsWith",
    "substring",
    "substr",
    "charAt",
    "charCodeAt",
    "padStart",
    "padEnd",
    "match",
    "toString",
    "toFixed",
    "valueOf",
    // promises
    "then",
    "catch",
    "finally",
    "all",
    "allSettled",
    "race",
    "any",
    "resolve",
    "reject",
    // object helpers
    "keys",
    "values",
    "entries",
    "assign",
    "freeze",
    "hasOwnProperty",
    "call",
    "apply",
    "bind",
    "stringify",
    "parse",
    // python containers
    "append",
    "extend",
    "items",
    "get",
    "format",
    "strip",
    // rust std
    "unwrap",
    "expect",
    "clone",
    "iter",
    "into_iter",
    "collect",
    "to_string",
    "as_str",
    "len",
    "is_empty",
];

pub fn is_builtin_function(name: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(&name)
}

pub fn is_builtin_method(name: &str) -> bool {
    BUILTIN_METHODS.contains(&name)
}
