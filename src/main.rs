fn main() {
    if let Err(err) = mercado_etl::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
