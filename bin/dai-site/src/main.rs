//! # dai-site Binary
//!
//! Assembles a `SiteStore` on the configured storage plugin and runs one
//! visitor or admin action against it.

mod cli;

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use cli::{Cli, Commands};
use configs::StorageBackend;
use dai_core::error::AppError;
use dai_core::store::{admin_signal_from_query, SiteStore};
use dai_core::traits::KvStore;
use dai_ui::{BodyEffects, PageChrome};

// Feature-gated imports: only the compiled-in plugins are selectable
#[cfg(feature = "kv-file")]
use dai_kv_file::FileKvStore;

#[cfg(feature = "kv-memory")]
use dai_kv_memory::MemoryKvStore;

fn open_storage(settings: &configs::StorageSettings) -> anyhow::Result<Arc<dyn KvStore>> {
    match settings.backend {
        #[cfg(feature = "kv-file")]
        StorageBackend::File => Ok(Arc::new(FileKvStore::new(settings.root.clone()))),
        #[cfg(feature = "kv-memory")]
        StorageBackend::Memory => Ok(Arc::new(MemoryKvStore::new())),
        #[allow(unreachable_patterns)]
        other => bail!("storage backend {other:?} is not compiled in"),
    }
}

fn require_admin(store: &SiteStore) -> anyhow::Result<()> {
    if !store.is_admin() {
        return Err(AppError::Unauthorized("moderation requires admin mode (admin=1)".into()).into());
    }
    Ok(())
}

/// Applies one command to the store and returns the text to print.
fn run(command: Commands, store: &mut SiteStore) -> anyhow::Result<String> {
    match command {
        Commands::Show => {}
        Commands::Contrast { state } => store.set_high_contrast(state.into()),
        Commands::Motion { state } => store.set_reduced_motion(state.into()),
        Commands::FontBigger => store.increase_font_scale(),
        Commands::FontSmaller => store.decrease_font_scale(),
        Commands::Reset => store.reset_preferences(),
        Commands::Ack { reduce_motion } => {
            if reduce_motion {
                store.acknowledge_consent_with_reduced_motion();
            } else {
                store.acknowledge_consent();
            }
        }
        Commands::Submit { name, text, avatar } => {
            let item = store.submit_testimonial(&name, &text, avatar.as_deref())?;
            log::info!("testimonial from {} queued for approval", item.name);
        }
        Commands::Approve { index } => {
            require_admin(store)?;
            match store.approve_testimonial(index) {
                Some(item) => log::info!("approved testimonial from {}", item.name),
                None => log::warn!("no pending testimonial at index {index}"),
            }
        }
        Commands::Reject { index } => {
            require_admin(store)?;
            match store.reject_testimonial(index) {
                Some(item) => log::info!("rejected testimonial from {}", item.name),
                None => log::warn!("no pending testimonial at index {index}"),
            }
        }
        Commands::Body => {
            return Ok(BodyEffects::from(&store.preferences()).render_attrs()?);
        }
    }

    let output = serde_json::json!({
        "store": store.snapshot(),
        "page": PageChrome::from_store(store),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = configs::load().context("failed to load settings")?;
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&settings.log_level));

    let kv = open_storage(&settings.storage)?;
    let mut store = SiteStore::init(kv, admin_signal_from_query(&cli.admin_query));

    println!("{}", run(cli.command, &mut store)?);
    Ok(())
}
