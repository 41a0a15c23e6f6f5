use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};

use labelbind_core::annotation::domain::annotation::Annotation;
use labelbind_core::annotation::infrastructure::annotation_file::{
    read_annotation, read_meta, write_annotation,
};
use labelbind_core::pipeline::binding_report::BindingReport;
use labelbind_core::pipeline::discard_bindings_use_case::{DiscardBindingsUseCase, DiscardScope};
use labelbind_core::pipeline::inspect_bindings_use_case::InspectBindingsUseCase;
use labelbind_core::pipeline::upload_annotation_use_case::{UploadAnnotationUseCase, UploadRequest};
use labelbind_core::platform::domain::annotation_platform::AnnotationPlatform;
use labelbind_core::platform::infrastructure::http_platform_client::HttpPlatformClient;
use labelbind_core::platform::infrastructure::platform_config::PlatformConfig;
use labelbind_core::shared::binding_key::BindingKey;
use labelbind_core::shared::constants::{API_TOKEN_ENV, SERVER_ADDRESS_ENV};

/// Create, inspect and discard label bindings on an annotation platform.
#[derive(Parser)]
#[command(name = "labelbind", version)]
struct Cli {
    /// Platform server address.
    #[arg(long, global = true, env = SERVER_ADDRESS_ENV)]
    server: Option<String>,

    /// Platform API token.
    #[arg(long, global = true, env = API_TOKEN_ENV, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store the server address and token in the user config directory.
    Login,

    /// Create a project and dataset, then upload an image with its annotation.
    Upload {
        /// Workspace to create the project in.
        #[arg(long, env = "CONTEXT_WORKSPACEID")]
        workspace_id: u64,

        /// Project name (a suffix is added if taken).
        #[arg(long, default_value = "tutorial-bindings")]
        project_name: String,

        #[arg(long, default_value = "dataset-01")]
        dataset_name: String,

        /// Image file to upload.
        image: PathBuf,

        /// Project meta JSON declaring the object classes.
        #[arg(long)]
        meta: PathBuf,

        /// Annotation JSON for the image.
        #[arg(long)]
        annotation: PathBuf,

        /// Bind every label under this key.
        #[arg(long, conflicts_with = "bind_class", value_parser = NonEmptyStringValueParser::new())]
        bind: Option<String>,

        /// Bind all labels of a class: CLASS=KEY (repeatable).
        #[arg(long)]
        bind_class: Vec<String>,
    },

    /// Print binding keys and groups of an image's annotation.
    Inspect {
        #[arg(long)]
        project_id: u64,

        #[arg(long)]
        image_id: u64,
    },

    /// Discard bindings on an image's annotation and upload it back.
    Discard {
        #[arg(long)]
        project_id: u64,

        #[arg(long)]
        image_id: u64,

        /// Only discard bindings of labels of this class.
        #[arg(long)]
        class: Option<String>,
    },

    /// Print binding groups of a local annotation file.
    Group {
        /// Annotation JSON.
        annotation: PathBuf,

        /// Project meta JSON declaring the object classes.
        #[arg(long)]
        meta: PathBuf,

        /// Discard bindings of labels of this class before grouping.
        #[arg(long, conflicts_with = "discard_all")]
        discard_class: Option<String>,

        /// Discard all bindings before grouping.
        #[arg(long)]
        discard_all: bool,

        /// Write the resulting annotation here.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Login => run_login(
            cli.server,
            cli.token,
            &PlatformConfig::config_path()?,
            PlatformConfig::env_file_path().as_deref(),
        ),
        Command::Upload {
            workspace_id,
            project_name,
            dataset_name,
            image,
            meta,
            annotation,
            bind,
            bind_class,
        } => {
            let bind_class = parse_bind_classes(&bind_class)?;
            let platform = connect(cli.server, cli.token)?;
            run_upload(
                platform,
                workspace_id,
                &project_name,
                &dataset_name,
                &image,
                &meta,
                &annotation,
                bind,
                &bind_class,
            )
        }
        Command::Inspect {
            project_id,
            image_id,
        } => {
            let platform = connect(cli.server, cli.token)?;
            let (annotation, report) =
                InspectBindingsUseCase::new(platform).execute(project_id, image_id)?;
            print_label_keys(&annotation);
            print_report(&report);
            Ok(())
        }
        Command::Discard {
            project_id,
            image_id,
            class,
        } => {
            let platform = connect(cli.server, cli.token)?;
            let scope = class.map_or(DiscardScope::All, DiscardScope::Class);
            let outcome =
                DiscardBindingsUseCase::new(platform).execute(project_id, image_id, &scope)?;
            println!("Discarded {} bindings", outcome.cleared);
            print_report(&outcome.report);
            Ok(())
        }
        Command::Group {
            annotation,
            meta,
            discard_class,
            discard_all,
            output,
        } => run_group(&annotation, &meta, discard_class, discard_all, output.as_deref()),
    }
}

fn run_login(
    server: Option<String>,
    token: Option<String>,
    path: &Path,
    env_file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = PlatformConfig::resolve(server, token, path, env_file)?;
    config.save(path)?;
    log::info!("Credentials saved to {}", path.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_upload(
    platform: Box<dyn AnnotationPlatform>,
    workspace_id: u64,
    project_name: &str,
    dataset_name: &str,
    image: &Path,
    meta: &Path,
    annotation: &Path,
    bind: Option<String>,
    bind_class: &[(String, BindingKey)],
) -> Result<(), Box<dyn std::error::Error>> {
    let meta = read_meta(meta)?;
    let mut annotation = read_annotation(annotation, &meta)?;

    if let Some(key) = bind {
        let indices: Vec<usize> = (0..annotation.labels.len()).collect();
        annotation.bind(&indices, &BindingKey::new(key))?;
    }
    for (class, key) in bind_class {
        let bound = annotation.bind_class(class, key);
        if bound == 0 {
            log::warn!("No labels of class '{class}' to bind");
        }
    }

    let content = fs::read(image).map_err(|e| format!("{}: {e}", image.display()))?;
    let image_name = image
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("Invalid image file name: {}", image.display()))?;

    let outcome = UploadAnnotationUseCase::new(platform).execute(UploadRequest {
        workspace_id,
        project_name,
        dataset_name,
        image_name,
        image_content: &content,
        meta: &meta,
        annotation,
    })?;
    println!(
        "Uploaded image id={} to project '{}' (id={})",
        outcome.image.id, outcome.project.name, outcome.project.id
    );
    print_report(&outcome.report);
    Ok(())
}

fn run_group(
    annotation: &Path,
    meta: &Path,
    discard_class: Option<String>,
    discard_all: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let meta = read_meta(meta)?;
    let mut annotation = read_annotation(annotation, &meta)?;

    let scope = if discard_all {
        Some(DiscardScope::All)
    } else {
        discard_class.map(DiscardScope::Class)
    };
    if let Some(scope) = scope {
        let cleared = scope.apply(&mut annotation);
        log::info!("Discarded {cleared} bindings");
    }

    print_report(&BindingReport::from_annotation(&annotation));
    if let Some(path) = output {
        write_annotation(path, &annotation)?;
        log::info!("Annotation written to {}", path.display());
    }
    Ok(())
}

fn connect(
    server: Option<String>,
    token: Option<String>,
) -> Result<Box<dyn AnnotationPlatform>, Box<dyn std::error::Error>> {
    let config = PlatformConfig::resolve(
        server,
        token,
        &PlatformConfig::config_path()?,
        PlatformConfig::env_file_path().as_deref(),
    )?;
    log::info!("Connecting to {}", config.server_address);
    Ok(Box::new(HttpPlatformClient::new(&config)?))
}

fn parse_bind_classes(
    specs: &[String],
) -> Result<Vec<(String, BindingKey)>, Box<dyn std::error::Error>> {
    specs
        .iter()
        .map(|spec| match spec.split_once('=') {
            Some((class, key)) if !class.is_empty() && !key.is_empty() => {
                Ok((class.to_string(), BindingKey::new(key)))
            }
            _ => Err(Box::<dyn std::error::Error>::from(format!(
                "--bind-class expects CLASS=KEY, got '{spec}'"
            ))),
        })
        .collect()
}

fn print_label_keys(annotation: &Annotation) {
    for label in &annotation.labels {
        match label.binding_key() {
            Some(key) => println!("{}: {key}", label.obj_class.name),
            None => println!("{}: -", label.obj_class.name),
        }
    }
}

fn print_report(report: &BindingReport) {
    for line in report.summary_lines() {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    const META: &str = r##"{"classes": [
        {"title": "car", "shape": "point", "color": "#FF00FF"},
        {"title": "wheel", "shape": "point", "color": "#0000FF"}
    ]}"##;
    const ANN: &str = r#"{
        "size": {"height": 4, "width": 6},
        "objects": [
            {"classTitle": "car", "geometryType": "point", "instance": "g1",
             "points": {"exterior": [[1, 2]], "interior": []}},
            {"classTitle": "wheel", "geometryType": "point", "instance": "g1",
             "points": {"exterior": [[3, 1]], "interior": []}},
            {"classTitle": "car", "geometryType": "point",
             "points": {"exterior": [[5, 3]], "interior": []}}
        ]
    }"#;

    fn annotation_files(tmp: &TempDir) -> (PathBuf, PathBuf) {
        let meta = tmp.path().join("meta.json");
        let annotation = tmp.path().join("ann.json");
        fs::write(&meta, META).unwrap();
        fs::write(&annotation, ANN).unwrap();
        (meta, annotation)
    }

    fn written_instances(path: &Path) -> Vec<Option<String>> {
        let json: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        json["objects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.get("instance").and_then(Value::as_str).map(String::from))
            .collect()
    }

    #[test]
    fn test_parse_bind_classes() {
        let parsed = parse_bind_classes(&["car=g1".to_string(), "wheel=g1".to_string()]).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("car".to_string(), BindingKey::new("g1")),
                ("wheel".to_string(), BindingKey::new("g1")),
            ]
        );
    }

    #[test]
    fn test_parse_bind_classes_rejects_missing_key() {
        assert!(parse_bind_classes(&["car=".to_string()]).is_err());
        assert!(parse_bind_classes(&["car".to_string()]).is_err());
    }

    #[test]
    fn test_cli_parses_discard_with_class() {
        let cli = Cli::try_parse_from([
            "labelbind",
            "--server",
            "https://x",
            "discard",
            "--project-id",
            "13409",
            "--image-id",
            "3314153",
            "--class",
            "car",
        ])
        .unwrap();
        match cli.command {
            Command::Discard {
                project_id,
                image_id,
                class,
            } => {
                assert_eq!(project_id, 13409);
                assert_eq!(image_id, 3314153);
                assert_eq!(class.as_deref(), Some("car"));
            }
            _ => panic!("expected discard"),
        }
    }

    #[test]
    fn test_cli_rejects_bind_with_bind_class() {
        let result = Cli::try_parse_from([
            "labelbind",
            "upload",
            "--workspace-id",
            "1",
            "--meta",
            "meta.json",
            "--annotation",
            "ann.json",
            "--bind",
            "g1",
            "--bind-class",
            "car=g2",
            "image.jpg",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_empty_bind_key() {
        let result = Cli::try_parse_from([
            "labelbind",
            "upload",
            "--workspace-id",
            "1",
            "--meta",
            "meta.json",
            "--annotation",
            "ann.json",
            "--bind",
            "",
            "image.jpg",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_group_discard_class_writes_output() {
        let tmp = TempDir::new().unwrap();
        let (meta, annotation) = annotation_files(&tmp);
        let output = tmp.path().join("out.json");

        run_group(
            &annotation,
            &meta,
            Some("car".to_string()),
            false,
            Some(output.as_path()),
        )
        .unwrap();

        assert_eq!(
            written_instances(&output),
            vec![None, Some("g1".to_string()), None]
        );
    }

    #[test]
    fn test_group_discard_all_writes_output() {
        let tmp = TempDir::new().unwrap();
        let (meta, annotation) = annotation_files(&tmp);
        let output = tmp.path().join("out.json");

        run_group(&annotation, &meta, None, true, Some(output.as_path())).unwrap();

        assert_eq!(written_instances(&output), vec![None, None, None]);
    }

    #[test]
    fn test_group_without_discard_keeps_bindings() {
        let tmp = TempDir::new().unwrap();
        let (meta, annotation) = annotation_files(&tmp);
        let output = tmp.path().join("out.json");

        run_group(&annotation, &meta, None, false, Some(output.as_path())).unwrap();

        assert_eq!(
            written_instances(&output),
            vec![Some("g1".to_string()), Some("g1".to_string()), None]
        );
    }

    #[test]
    fn test_group_without_output_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let (meta, annotation) = annotation_files(&tmp);

        run_group(&annotation, &meta, None, true, None).unwrap();

        assert_eq!(fs::read_to_string(&annotation).unwrap(), ANN);
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_group_reports_missing_annotation() {
        let tmp = TempDir::new().unwrap();
        let (meta, _) = annotation_files(&tmp);
        let err = run_group(&tmp.path().join("nope.json"), &meta, None, false, None).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_login_saves_resolved_credentials() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("labelbind").join("credentials.json");

        run_login(
            Some("https://app.example.com".to_string()),
            Some("secret".to_string()),
            &path,
            None,
        )
        .unwrap();

        let saved = PlatformConfig::resolve(None, None, &path, None).unwrap();
        assert_eq!(saved, PlatformConfig::new("https://app.example.com", "secret"));
    }

    #[test]
    fn test_login_takes_missing_values_from_env_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("credentials.json");
        let env_file = tmp.path().join("supervisely.env");
        fs::write(&env_file, "SERVER_ADDRESS=https://env.example.com\nAPI_TOKEN=env-token\n")
            .unwrap();

        run_login(None, Some("cli-token".to_string()), &path, Some(env_file.as_path())).unwrap();

        let saved = PlatformConfig::resolve(None, None, &path, None).unwrap();
        assert_eq!(saved, PlatformConfig::new("https://env.example.com", "cli-token"));
    }

    #[test]
    fn test_login_without_server_fails_and_saves_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("credentials.json");
        assert!(run_login(None, Some("t".to_string()), &path, None).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
