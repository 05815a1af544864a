fn main() {
    if let Err(err) = ebnf_railroad::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
