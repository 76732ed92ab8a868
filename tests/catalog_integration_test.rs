use anyhow::Result;
use httpmock::prelude::*;
use sdk_catalog::core::export::export_candidates;
use sdk_catalog::domain::model::Version;
use sdk_catalog::domain::ports::Storage;
use sdk_catalog::{CatalogError, CatalogService, LocalStorage, OutputFormat, SdkmanApi};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const CANDIDATES_LIST: &str = include_str!("fixtures/candidates_list.txt");
const JAVA_VERSIONS: &str = include_str!("fixtures/java_versions.txt");

fn api(server: &MockServer) -> SdkmanApi {
    SdkmanApi::with_options(
        &server.url("/2"),
        "linuxx64",
        Duration::from_secs(5),
        1,
        Duration::from_millis(10),
    )
    .unwrap()
}

fn install(root: &Path, candidate: &str, versions: &[&str]) {
    for version in versions {
        fs::create_dir_all(root.join(candidate).join(version)).unwrap();
    }
}

#[tokio::test]
async fn test_list_candidates_from_api() -> Result<()> {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET).path("/2/candidates/list");
        then.status(200)
            .header("Content-Type", "text/plain")
            .body(CANDIDATES_LIST);
    });

    let service = CatalogService::new(api(&server));
    let candidates = service.list_candidates().await?;

    list_mock.assert();
    // The block without a homepage is skipped.
    assert_eq!(candidates.len(), 3);
    assert_eq!(candidates[0].name, "Apache ActiveMQ (Classic)");
    assert_eq!(candidates[0].default_version, "5.17.1");
    assert_eq!(candidates[1].binary_name, "gradle");
    assert_eq!(
        candidates[2].homepage,
        "https://projects.eclipse.org/projects/adoptium.temurin/"
    );
    assert_eq!(candidates[2].default_version, "17.0.7-tem");
    assert!(candidates.iter().all(|c| !c.description.is_empty()));
    Ok(())
}

#[tokio::test]
async fn test_list_marks_installed_candidates() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/2/candidates/list");
        then.status(200).body(CANDIDATES_LIST);
    });
    let temp_dir = TempDir::new()?;
    install(temp_dir.path(), "gradle", &["8.0.2", "7.6"]);
    install(temp_dir.path(), "not-in-catalog", &["1.0"]);

    let service =
        CatalogService::new(api(&server)).with_candidates_dir(Some(temp_dir.path().to_path_buf()));
    let candidates = service.list_candidates().await?;

    let gradle = candidates.iter().find(|c| c.binary_name == "gradle").unwrap();
    assert_eq!(gradle.installed_versions, vec!["8.0.2", "7.6"]);
    assert!(candidates
        .iter()
        .filter(|c| c.binary_name != "gradle")
        .all(|c| !c.is_installed()));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_java_versions_send_local_state_and_merge_it() -> Result<()> {
    let server = MockServer::start();
    let versions_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/2/candidates/java/linuxx64/versions/list")
            .query_param("current", "17.0.7-tem")
            .query_param("installed", "17.0.7-tem,11.0.19-tem,8.0.372-custom");
        then.status(200).body(JAVA_VERSIONS);
    });

    let temp_dir = TempDir::new()?;
    install(
        temp_dir.path(),
        "java",
        &["17.0.7-tem", "11.0.19-tem", "8.0.372-custom"],
    );
    std::os::unix::fs::symlink(
        temp_dir.path().join("java").join("17.0.7-tem"),
        temp_dir.path().join("java").join("current"),
    )?;

    let service =
        CatalogService::new(api(&server)).with_candidates_dir(Some(temp_dir.path().to_path_buf()));
    let versions = service.candidate_versions("java").await?;

    versions_mock.assert();
    assert_eq!(versions.len(), 6);

    let current: Vec<&str> = versions
        .iter()
        .filter(|v| v.current)
        .map(|v| v.identifier())
        .collect();
    assert_eq!(current, vec!["17.0.7-tem"]);

    let custom = versions
        .iter()
        .find(|v| v.identifier() == "8.0.372-custom")
        .unwrap();
    assert!(custom.local_only && custom.installed);
    assert!(matches!(custom.version, Version::Java { ref status, .. } if status == "local only"));

    match &versions[1].version {
        Version::Java { vendor, .. } => assert_eq!(vendor, "Corretto"),
        other => panic!("expected java row, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_unknown_candidate_versions_reports_server_error() -> Result<()> {
    let server = MockServer::start();
    let versions_mock = server.mock(|when, then| {
        when.method(GET).path("/2/candidates/nope/linuxx64/versions/list");
        then.status(400).body("Invalid candidate");
    });

    let service = CatalogService::new(api(&server));
    let err = service.candidate_versions("nope").await.unwrap_err();

    versions_mock.assert_hits(1);
    assert!(matches!(err, CatalogError::ServerError { status: 400, .. }));
    Ok(())
}

#[tokio::test]
async fn test_show_unknown_candidate_is_not_found() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/2/candidates/list");
        then.status(200).body(CANDIDATES_LIST);
    });

    let service = CatalogService::new(api(&server));

    assert_eq!(service.find_candidate("Gradle").await?.binary_name, "gradle");
    assert!(matches!(
        service.find_candidate("kotlin").await,
        Err(CatalogError::CandidateNotFound { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_default_version_and_names() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/2/candidates/default/gradle");
        then.status(200).body("8.0.2\n");
    });
    server.mock(|when, then| {
        when.method(GET).path("/2/candidates/all");
        then.status(200).body("activemq,gradle,java");
    });

    let service = CatalogService::new(api(&server));

    assert_eq!(service.default_version("gradle").await?, "8.0.2");
    assert_eq!(
        service.candidate_names().await?,
        vec!["activemq", "gradle", "java"]
    );
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_export_to_local_storage() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/2/candidates/list");
        then.status(200).body(CANDIDATES_LIST);
    });
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("export");
    let storage = LocalStorage::new(output_path.to_string_lossy().into_owned());

    let service = CatalogService::new(api(&server));
    let candidates = service.list_candidates().await?;
    let file_name = export_candidates(&storage, &candidates, OutputFormat::Csv, 80).await?;

    assert!(output_path.join(file_name).is_file());
    let content = storage.read_file(file_name).await?;
    let mut reader = csv::Reader::from_reader(content.as_slice());
    let rows: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[1][1], "gradle");

    assert!(matches!(
        storage.read_file("missing.csv").await,
        Err(CatalogError::IoError(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_api_is_network_error() -> Result<()> {
    let service = CatalogService::new(SdkmanApi::with_options(
        "http://127.0.0.1:9/2",
        "linuxx64",
        Duration::from_secs(1),
        0,
        Duration::from_millis(1),
    )?);

    let err = service.list_candidates().await.unwrap_err();
    assert!(matches!(err, CatalogError::ApiError(_)));
    Ok(())
}
