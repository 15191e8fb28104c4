use std::fs;
use std::path::Path;

use anyhow::Result;

use form_routes::{url_path, RouteDiscovery, RouteError};

fn plant(root: &Path, files: &[&str]) -> Result<()> {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, "<!-- page -->")?;
    }
    Ok(())
}

#[test]
fn discovers_conventional_routes() -> Result<()> {
    let scratch = tempfile::tempdir()?;
    plant(
        scratch.path(),
        &[
            "index.html",
            "about.html",
            "$id.html",
            "users/index.html",
            "users/$userId.html",
            "categories/$categoryId/products/$productId.html",
            "notes.txt",
        ],
    )?;

    let routes = RouteDiscovery::new(scratch.path()).discover()?;
    let mut paths: Vec<&str> = routes.iter().map(|route| route.path.as_str()).collect();
    paths.sort_unstable();

    assert_eq!(
        paths,
        vec![
            "/",
            "/:id",
            "/about",
            "/categories/:categoryId/products/:productId",
            "/users",
            "/users/:userId",
        ]
    );

    // the unrecognized extension never became a route
    assert!(routes
        .iter()
        .all(|route| route.source.extension().and_then(|ext| ext.to_str()) == Some("html")));

    Ok(())
}

#[test]
fn list_files_sees_every_file() -> Result<()> {
    let scratch = tempfile::tempdir()?;
    plant(scratch.path(), &["a.html", "b.txt", "deep/nested/c.md"])?;

    let files = RouteDiscovery::new(scratch.path()).list_files()?;
    assert_eq!(files.len(), 3);
    assert!(files.iter().all(|file| file.is_absolute()));

    Ok(())
}

#[test]
fn custom_extension_set_drives_recognition() -> Result<()> {
    let scratch = tempfile::tempdir()?;
    plant(scratch.path(), &["page.tmpl", "skipped.html"])?;

    let routes = RouteDiscovery::new(scratch.path())
        .extensions([".tmpl"])
        .discover()?;

    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].path, "/page");

    Ok(())
}

#[test]
fn missing_root_fails() {
    let err = RouteDiscovery::new("/definitely/not/here")
        .list_files()
        .unwrap_err();
    assert!(matches!(err, RouteError::NotADirectory(_)));
}

#[test]
fn transform_matches_the_documented_conventions() {
    let root = Path::new("/srv/routes");
    let exts = ["ts"];

    // a root-level index file maps to the root itself
    assert_eq!(
        url_path(&root.join("index.ts"), root, &exts).unwrap().as_deref(),
        Some("/")
    );
    // idempotent on already-canonical inputs
    assert_eq!(
        url_path(Path::new("/users/index.ts"), Path::new("/users"), &exts)
            .unwrap()
            .as_deref(),
        Some("/")
    );
    assert_eq!(
        url_path(&root.join("$id.ts"), root, &exts).unwrap().as_deref(),
        Some("/:id")
    );
    assert_eq!(
        url_path(
            &root.join("categories/$categoryId/products/$productId.ts"),
            root,
            &exts
        )
        .unwrap()
        .as_deref(),
        Some("/categories/:categoryId/products/:productId")
    );
}
