fn main() {
    if let Err(e) = forkbench::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
