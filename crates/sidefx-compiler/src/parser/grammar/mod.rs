//! Grammar productions for the source language.
//!
//! This module implements all `parse_*` methods as an extension of `Parser`.
//! Items and statements recover at `;` and `}`; expressions never consume
//! a token they cannot use, so the enclosing statement decides how to resync.

mod expressions;
mod items;
mod statements;
mod types;
