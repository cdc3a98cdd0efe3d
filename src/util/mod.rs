pub mod process;
pub mod testing;
