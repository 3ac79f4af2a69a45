// SPDX-License-Identifier: MPL-2.0
use pitchside::app::{self, Flags};

const HELP: &str = "\
Pitchside - live commentary desk and match video player

USAGE:
  pitchside [OPTIONS] [VIDEO]

OPTIONS:
  --lang <LOCALE>         Interface language (e.g. en-US, fr)
  --config-dir <PATH>     Directory holding settings.toml
  --api-base-url <URL>    Commentary backend root (overrides [feed] api_base_url)
  -h, --help              Print this help

ARGS:
  <VIDEO>                 Video file to play (overrides [video] source)
";

fn parse_flags() -> Result<Option<Flags>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let lang = args.opt_value_from_str("--lang")?;
    let config_dir = args.opt_value_from_str("--config-dir")?;
    let api_base_url = args.opt_value_from_str("--api-base-url")?;
    let video_path = args
        .finish()
        .into_iter()
        .next()
        .and_then(|s| s.into_string().ok());

    Ok(Some(Flags {
        lang,
        config_dir,
        api_base_url,
        video_path,
    }))
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match parse_flags() {
        Ok(Some(flags)) => app::run(flags),
        Ok(None) => {
            print!("{HELP}");
            Ok(())
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            std::process::exit(2);
        }
    }
}
