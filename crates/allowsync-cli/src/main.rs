fn main() -> std::process::ExitCode {
    allowsync_cli::run()
}
