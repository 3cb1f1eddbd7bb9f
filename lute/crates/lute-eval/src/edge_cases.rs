//! End-to-end evaluator tests: source in, value or error out.
