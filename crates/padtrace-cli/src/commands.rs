use anyhow::Result;
use padtrace_engine::ExtractOptions;

use crate::args::{Cli, Commands};
use crate::handlers;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract {
            input,
            output,
            exclude_client,
            exclude_relay,
            allow_ips,
            filter_client_negotiate,
            filter_relay_negotiate,
            blacklist,
        } => {
            let mut opts = ExtractOptions {
                exclude_client,
                exclude_relay,
                allow_ips,
                filter_client_negotiate,
                filter_relay_negotiate,
                ..ExtractOptions::default()
            };
            opts.blacklist.extend(blacklist);
            handlers::extract::handle(&input, &output, &opts)
        }

        Commands::Wf {
            input,
            output,
            format,
            extension,
        } => handlers::wf::handle(&input, &output, format.into(), extension.as_deref()),

        Commands::Overhead { input, output } => {
            handlers::overhead::handle(&input, output.as_deref())
        }
    }
}
