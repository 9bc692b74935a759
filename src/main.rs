fn main() {
    if handle_cli_flags() {
        return;
    }

    if let Err(err) = linkdeck::run() {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}

fn handle_cli_flags() -> bool {
    let mut saw_flag = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("Linkdeck {}", linkdeck::VERSION);
                saw_flag = true;
            }
            "--help" | "-h" => {
                println!(
                    "Linkdeck — your link-in-bio page, in the terminal.\n\n  --version, -V        Show version and exit\n  --help,    -h        Show this help message\n\nConfiguration lives at ~/.config/linkdeck/config.yaml; links are read\nfrom the configured JSON source (a file path or an http(s) URL)."
                );
                saw_flag = true;
            }
            _ => {}
        }
    }
    saw_flag
}
