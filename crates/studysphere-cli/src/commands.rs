//! Subcommand handlers.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use studysphere_kernel::{
    Browser, BrowserError, FileCategory, ObjectStore, UploadRequest, format_file_size,
};
use studysphere_types::{EntryKind, ResourceEntry, VirtualPath};

use crate::Command;

pub(crate) async fn run(
    browser: &mut Browser,
    store: &dyn ObjectStore,
    command: Command,
) -> Result<()> {
    match command {
        Command::Ls { path, json } => ls(browser, &path, json).await,
        Command::Upload {
            file,
            to,
            content_type,
        } => upload(browser, file, &to, content_type).await,
        Command::Mkdir { path } => mkdir(browser, &path).await,
        Command::Mv { path, new_name } => mv(browser, &path, &new_name).await,
        Command::Rm { path, yes } => rm(browser, &path, yes).await,
        Command::Url { path } => url(browser, &path).await,
        Command::Cat { path } => cat(browser, &path).await,
        Command::Get { path, output } => get(browser, store, &path, output).await,
    }
}

/// One listed entry, as printed by `ls --json`.
#[derive(Debug, Serialize)]
struct Row<'a> {
    name: &'a str,
    display_name: String,
    kind: EntryKind,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<FileCategory>,
}

fn rows(browser: &Browser) -> Vec<Row<'_>> {
    browser
        .entries()
        .iter()
        .map(|e| Row {
            name: &e.name,
            display_name: browser.display_name(e),
            kind: e.kind,
            path: &e.path,
            category: e.is_file().then(|| FileCategory::of(&e.name)),
        })
        .collect()
}

/// Open the parent of `path` and find the entry it names.
async fn locate(browser: &mut Browser, path: &str) -> Result<ResourceEntry> {
    let target = VirtualPath::parse(path);
    let name = target
        .name()
        .context("the root is not a file or folder")?
        .to_string();
    browser.open(target.parent()).await?;
    browser
        .entry(&name)
        .cloned()
        .with_context(|| format!("no such file or folder: {}", target))
}

async fn ls(browser: &mut Browser, path: &str, json: bool) -> Result<()> {
    browser.open(VirtualPath::parse(path)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows(browser))?);
        return Ok(());
    }

    for row in rows(browser) {
        match row.category {
            Some(category) => println!("{:<6} {}", category.as_str(), row.display_name),
            None => println!("{:<6} {}/", "dir", row.display_name),
        }
    }
    if !browser.can_manage() {
        tracing::debug!(path = %browser.current_path(), "read-only here");
    }
    Ok(())
}

async fn upload(
    browser: &mut Browser,
    file: PathBuf,
    to: &str,
    content_type: Option<String>,
) -> Result<()> {
    let file_name = file
        .file_name()
        .with_context(|| format!("not a file: {}", file.display()))?
        .to_string_lossy()
        .into_owned();
    let data = tokio::fs::read(&file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;

    let req = match content_type {
        Some(content_type) => UploadRequest::new(file_name, content_type, data),
        None => UploadRequest::guess(file_name, data),
    };
    let size = req.size();

    browser.open(VirtualPath::parse(to)).await?;
    let key = browser.upload(req).await?;
    println!("{} ({})", key, format_file_size(size));
    Ok(())
}

async fn mkdir(browser: &mut Browser, path: &str) -> Result<()> {
    let target = VirtualPath::parse(path);
    let name = target.name().context("the root already exists")?.to_string();
    browser.open(target.parent()).await?;
    let folder = browser.create_folder(&name).await?;
    println!("{}", folder);
    Ok(())
}

async fn mv(browser: &mut Browser, path: &str, new_name: &str) -> Result<()> {
    let entry = locate(browser, path).await?;
    let report = browser.rename(&entry, new_name).await?;
    tracing::debug!("{}", report);
    println!("{} -> {}", entry.path, entry.virtual_path().parent().key_for(new_name));
    Ok(())
}

async fn rm(browser: &mut Browser, path: &str, yes: bool) -> Result<()> {
    let entry = locate(browser, path).await?;
    let prompt = |question: &str| {
        if yes {
            return true;
        }
        eprint!("{} [y/N] ", question);
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
            Err(_) => false,
        }
    };

    match browser.delete(&entry, &prompt).await {
        Ok(_) => {
            println!("{}", entry.path);
            Ok(())
        }
        Err(BrowserError::Declined) => {
            eprintln!("cancelled");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn url(browser: &mut Browser, path: &str) -> Result<()> {
    let entry = locate(browser, path).await?;
    let link = browser.download(&entry).await?;
    println!("{}", link.url);
    Ok(())
}

async fn cat(browser: &mut Browser, path: &str) -> Result<()> {
    let entry = locate(browser, path).await?;
    let preview = browser.preview(&entry).await?;
    match &preview.text {
        Some(text) => print!("{}", text),
        None => println!("{}", preview.url),
    }
    Ok(())
}

/// Fetch through a signed link and save it, the way a web client would.
async fn get(
    browser: &mut Browser,
    store: &dyn ObjectStore,
    path: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let entry = locate(browser, path).await?;
    let link = browser.download(&entry).await?;
    let data = store
        .read_signed(&link.url)
        .await
        .with_context(|| format!("fetching {}", link.url))?;

    let output = output.unwrap_or_else(|| PathBuf::from(&link.file_name));
    tokio::fs::write(&output, &data)
        .await
        .with_context(|| format!("writing {}", output.display()))?;
    eprintln!(
        "saved {} ({})",
        output.display(),
        format_file_size(data.len() as u64)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use studysphere_kernel::{LocalStore, RecordingNotifier, ResourcesConfig, UploadOptions};
    use studysphere_types::{Role, Session, User, UserId};

    async fn browser_in(dir: &std::path::Path, role: Role) -> (Browser, Arc<LocalStore>) {
        let store = Arc::new(LocalStore::new("resources", dir));
        for key in ["admin/.keep", "teachers/amy/week1/slides.pdf"] {
            store
                .upload(key, b"data", UploadOptions::upsert())
                .await
                .unwrap();
        }
        let user = User::new(UserId::from_handle("amy"), "amy", role);
        let browser = Browser::new(
            Session::new(user),
            store.clone(),
            Arc::new(RecordingNotifier::new()),
            ResourcesConfig::default(),
        );
        (browser, store)
    }

    #[tokio::test]
    async fn test_locate() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut b, _) = browser_in(dir.path(), Role::Teacher).await;

        let entry = locate(&mut b, "teachers/amy/week1/slides.pdf").await.unwrap();
        assert_eq!(entry.path, "teachers/amy/week1/slides.pdf");
        assert_eq!(b.current_path(), &VirtualPath::parse("teachers/amy/week1"));

        assert!(locate(&mut b, "teachers/amy/missing.pdf").await.is_err());
        assert!(locate(&mut b, ".").await.is_err());
    }

    #[tokio::test]
    async fn test_rows_use_display_names() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut b, _) = browser_in(dir.path(), Role::Admin).await;
        b.refresh().await.unwrap();

        let json = serde_json::to_value(rows(&b)).unwrap();
        assert_eq!(json[0]["name"], "admin");
        assert_eq!(json[0]["display_name"], "My Folder");
        assert_eq!(json[0]["kind"], "folder");
        assert!(json[0].get("category").is_none());
        assert_eq!(json[1]["display_name"], "Teachers");
    }

    #[tokio::test]
    async fn test_get_saves_through_signed_link() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = tempfile::TempDir::new().unwrap();
        let (mut b, store) = browser_in(dir.path(), Role::Student).await;

        let target = out.path().join("copy.pdf");
        get(&mut b, store.as_ref(), "teachers/amy/week1/slides.pdf", Some(target.clone()))
            .await
            .unwrap();
        assert_eq!(std::fs::read(target).unwrap(), b"data");
    }
}
