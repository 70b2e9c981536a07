mod cli;
mod commands;
mod output;

fn main() {
    tracing_subscriber::fmt::init();

    let code = match commands::run() {
        Ok(failures) => output::failure_exit_code(failures),
        Err(err) => {
            eprintln!("Error: {err}");
            1
        }
    };

    std::process::exit(code);
}
