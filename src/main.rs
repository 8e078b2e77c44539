use std::process;

fn main() {
    match tfbuild::cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            tfbuild::ui::output::error(format!("{:#}", err));
            // Resolution and dispatch failures share a single exit code.
            process::exit(2);
        }
    }
}
