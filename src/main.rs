use std::{env, path::PathBuf, process};

use vctheme::{VcThemeRuntime, VcThemeRuntimeKind};

const USAGE: &str = "Usage: vctheme <mode> <theme> [url] [css-file]
Available modes:
    open   <theme> [css-file]        Opens the terminal interface
    list   <theme> [css-file]        Lists the backdrops of the theme file
    select <theme> <url> [css-file]  Makes <url> the active backdrop
    add    <theme> <url> [css-file]  Adds <url> as a new backdrop
    delete <theme> <url> [css-file]  Deletes <url> from the theme file
Themes: Discord+ (DiscordPlus), SoftX, ClearVision, or any theme from vctheme.config.json";

/// Entry point of the VCTheme runtime.
///
/// Parses the command-line arguments into a runtime mode, then runs it. Any error is printed
/// and the process exits with status 1.
#[tokio::main]
async fn main() {
    // Skip the first argument (program name) since it's not required for logic.
    let mut args = env::args().skip(1);

    let (mode, theme_name) = match (args.next(), args.next()) {
        (Some(mode), Some(theme_name)) => (mode, theme_name),
        _ => exit_with_usage("Missing mode or theme name!"),
    };

    let runtime_mode = match mode.as_str() {
        "open" => VcThemeRuntimeKind::Open,
        "list" => VcThemeRuntimeKind::List,
        "select" | "add" | "delete" => {
            let url = match args.next() {
                Some(url) => url,
                None => exit_with_usage(&format!("The `{}` mode needs a backdrop URL!", mode)),
            };

            match mode.as_str() {
                "select" => VcThemeRuntimeKind::Select(url),
                "add" => VcThemeRuntimeKind::Add(url),
                _ => VcThemeRuntimeKind::Delete(url),
            }
        }
        _ => exit_with_usage(&format!("Invalid VCTheme mode `{}`!", mode)),
    };

    let css_file = args.next().map(PathBuf::from);

    // Get the current working directory to use as the runtime base directory.
    let current_dir = match env::current_dir() {
        Ok(current_dir) => current_dir,
        Err(err) => {
            eprintln!("Failed to read the current working directory: {}", err);
            process::exit(1);
        }
    };

    let mut runtime = VcThemeRuntime::new(runtime_mode, current_dir, theme_name, css_file);

    if let Err(err) = runtime.run().await {
        eprintln!("{}", err.get_message());
        process::exit(1);
    }
}

fn exit_with_usage(reason: &str) -> ! {
    eprintln!("{}\n\n{}", reason, USAGE);
    process::exit(2);
}
