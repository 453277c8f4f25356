fn main() {
    crypto_acb::tracing::setup_tracing();
    if crypto_acb::cmd::command_main().is_err() {
        std::process::exit(1);
    }
}
