mod export;
mod import;

pub use export::{problem_to_json, solution_to_json, solution_to_string, write_solution_file};
pub use import::{import_problem_file, import_problem_str};
