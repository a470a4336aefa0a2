//! Catalog refresh, install, upgrade and uninstall against an in-memory host.

use burrow_cli::cache::PackageCache;
use burrow_cli::config::{Context, Paths};
use burrow_cli::constants::GLOBAL_REMOTE_URL;
use burrow_cli::installations::InstallationStore;
use burrow_cli::installer::{InstallOptions, InstallOutcome, Installer};
use burrow_cli::test_utils::{FakeHost, init_test_logging, tar_gz, zip};
use burrow_cli::upgrade::{outdated, upgrade};
use burrow_cli::utils::platform::Platform;
use std::fs;
use tempfile::TempDir;

const PACKAGES: &str = "packages:
  - path: owner/tool
    executableName: tool
    type: binary
  - path: owner/helper
    executableName: helper
    type: script
";

fn host() -> FakeHost {
    FakeHost::new()
        .with_url(GLOBAL_REMOTE_URL, PACKAGES)
        .with_repository("owner/tool", "v1.3.0")
        .with_repository("owner/helper", "2024.1")
        .with_release("owner/tool", "v1.3.0", &[
            ("tool_1.3.0_darwin_arm64.tar.gz", tar_gz(&[("tool", b"darwin")])),
            ("tool_1.3.0_linux_amd64.tar.gz", tar_gz(&[("tool_1.3.0/tool", b"v1.3.0")])),
        ])
        .with_release("owner/tool", "v1.2.0", &[(
            "tool_1.2.0_linux_x86_64.zip",
            zip(&[("tool_1.2.0/tool", b"v1.2.0"), ("tool_1.2.0/tool.1", b"man page")]),
        )])
        .with_release("owner/helper", "2024.1", &[("helper", b"#!/bin/sh\necho hi\n".to_vec())])
}

fn context(temp: &TempDir) -> Context {
    Context::new(Paths::new(temp.path().join("root")))
        .with_platform(Platform::new("linux", "amd64"))
        .with_search_path(temp.path().join("empty-path"))
}

#[tokio::test]
async fn test_full_lifecycle() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp);
    let host = host();

    let cache = PackageCache::new(&ctx, &host);
    cache.update(false).await.unwrap();
    cache.update(true).await.unwrap();
    let catalog = cache.read().unwrap();
    assert!(catalog.iter().any(|p| p.executable_name == "tool" && p.latest_version == "v1.3.0"));

    let installer = Installer::new(&ctx, &host);
    let options = InstallOptions::default();

    // Pinned install picks the zip of the older release
    let outcome = installer.install(&catalog, "tool@v1.2.0", &options).await.unwrap();
    let InstallOutcome::Installed {
        record,
        path,
        ..
    } = outcome
    else {
        panic!("expected an install");
    };
    assert_eq!(record.real_name, "tool");
    assert_eq!(record.version, "v1.2.0");
    assert_eq!(fs::read(&path).unwrap(), b"v1.2.0");

    let store = InstallationStore::open(&ctx.paths.installations_file()).unwrap();
    let stale = outdated(&catalog, &store);
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].installed_versions, vec!["v1.2.0"]);

    // Upgrading everything moves the pinned install to the newest release
    let report = upgrade(&ctx, &host, &catalog, &[]).await.unwrap();
    assert_eq!(report.upgraded.len(), 1);
    assert_eq!(fs::read(ctx.paths.bin_dir().join("tool")).unwrap(), b"v1.3.0");

    // Installing again is a no-op that never reaches the host
    let calls = host.total_calls();
    let outcome = installer.install(&catalog, "tool", &options).await.unwrap();
    assert!(matches!(outcome, InstallOutcome::AlreadyLatest { .. }));
    assert_eq!(host.total_calls(), calls);

    let removed = installer.uninstall("tool").unwrap();
    assert_eq!(removed.version, "v1.3.0");
    assert!(!ctx.paths.bin_dir().join("tool").exists());
    let store = InstallationStore::open(&ctx.paths.installations_file()).unwrap();
    assert!(store.list().is_empty());
}

#[tokio::test]
async fn test_batch_install_of_binary_and_script() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp);
    let host = host();

    let cache = PackageCache::new(&ctx, &host);
    cache.update(false).await.unwrap();
    cache.update(true).await.unwrap();
    let catalog = cache.read().unwrap();

    let specs = vec!["tool".to_string(), "helper".to_string(), "burrow".to_string()];
    let outcomes = Installer::new(&ctx, &host)
        .install_many(&catalog, &specs, &InstallOptions::default())
        .await
        .unwrap();
    assert_eq!(outcomes.len(), 2);

    let helper = ctx.paths.bin_dir().join("helper");
    assert_eq!(fs::read_to_string(&helper).unwrap(), "#!/bin/sh\necho hi\n");

    // The refreshed catalog reflects both installs
    cache.update(true).await.unwrap();
    let catalog = cache.read().unwrap();
    let tool = catalog.iter().find(|p| p.executable_name == "tool").unwrap();
    assert_eq!(tool.installed_versions, vec!["v1.3.0"]);
}

#[tokio::test]
async fn test_unknown_package_leaves_nothing_behind() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp);
    let host = host();

    let error = Installer::new(&ctx, &host)
        .install(&[], "ghost", &InstallOptions::default())
        .await
        .unwrap_err();
    assert!(error.to_string().contains("ghost"));
    assert!(!ctx.paths.bin_dir().join("ghost").exists());
    assert_eq!(host.total_calls(), 0);
}
