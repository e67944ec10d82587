pub mod check;
pub mod dump;
pub mod source_loader;

#[cfg(test)]
mod source_loader_tests;
