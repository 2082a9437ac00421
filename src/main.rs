mod config;
mod library;
mod player;
mod runtime;
mod session;
mod ui;

fn main() {
    if let Err(err) = runtime::run() {
        eprintln!("encore: {err}");
        std::process::exit(1);
    }
}
