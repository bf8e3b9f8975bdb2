fn main() {
    if let Err(e) = signalscore_lib::run() {
        log::error!("Daily analysis failed: {e}");
        std::process::exit(1);
    }
}
