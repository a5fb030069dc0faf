use tonal_store::{FileStore, StoreError, VariableStore};
use tracing::info;

use crate::cli::InitStoreArgs;
use crate::context::{AppContext, CliError, CliResult};

pub(crate) async fn handle_init_store(ctx: &AppContext, args: InitStoreArgs) -> CliResult<String> {
    let path = ctx.store_path(args.store)?;
    let name = ctx.collection(args.collection)?;
    let store = FileStore::new(&path);

    let collection = match store.create_collection(&name).await {
        Ok(collection) => collection,
        Err(StoreError::DuplicateCollection { name }) => {
            return Err(CliError::validation(format!(
                "collection '{name}' already exists in {}",
                path.display()
            )));
        }
        Err(err) => return Err(CliError::failure(err)),
    };
    info!(
        store = %path.display(),
        collection = %collection.name,
        "variable collection created"
    );
    let mode = collection
        .default_mode()
        .map_or("<none>", |mode| mode.name.as_str());
    Ok(format!(
        "Created collection '{}' (default mode '{mode}') in {}",
        collection.name,
        path.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonal_config::TonalConfig;

    #[tokio::test]
    async fn init_store_creates_once() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("variables.json");
        let ctx = AppContext::new(TonalConfig::default());
        let args = || InitStoreArgs {
            store: Some(path.clone()),
            collection: Some("Tokens".to_string()),
        };

        let output = handle_init_store(&ctx, args())
            .await
            .map_err(|err| anyhow::anyhow!(err.display_message()))?;
        assert!(output.starts_with("Created collection 'Tokens' (default mode 'Mode 1')"));

        let collections = FileStore::new(&path).collections().await?;
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].name, "Tokens");

        let err = handle_init_store(&ctx, args())
            .await
            .expect_err("duplicate collection");
        assert_eq!(err.exit_code(), 2);
        Ok(())
    }
}
