pub mod core;
pub mod main;
#[cfg(test)]
mod tests;
