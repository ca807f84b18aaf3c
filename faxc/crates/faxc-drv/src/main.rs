fn main() {
    if let Err(e) = faxc_drv::main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
