fn main() {
    #[cfg(feature = "cli")]
    blockdiff::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("blockdiff: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
