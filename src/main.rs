fn main() {
    if let Err(err) = stats19_tidy::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
