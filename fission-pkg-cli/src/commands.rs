//! Command implementations, written against the library traits so they can
//! run over in-memory doubles.

use anyhow::Result;
use std::io::Write;

use fission_pkg::client::PackageApi;
use fission_pkg::core::ObjectMeta;
use fission_pkg::package::{
    create_package, ArchiveBuilder, CreatePackageRequest, DEPLOYMENT_OVERWRITE_NOTICE,
};

use crate::cli::CreateArgs;

/// Creates a package and reports its name.
pub async fn run_create(
    api: &dyn PackageApi,
    builder: &ArchiveBuilder<'_>,
    namespace: &str,
    args: CreateArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let mut request = CreatePackageRequest::new(args.environment)
        .with_namespace(namespace)
        .with_description(args.description);
    if let Some(path) = args.source {
        request = request.with_source(path);
    }
    if let Some(path) = args.deployment {
        request = request.with_deployment(path);
    }
    if let Some(command) = args.build_command {
        request = request.with_build_command(command);
    }

    // Shown up front so it is seen even when an upload or submission fails.
    if request.deployment_may_be_overwritten() {
        writeln!(out, "{DEPLOYMENT_OVERWRITE_NOTICE}")?;
    }
    let submission = create_package(api, builder, &request).await?;
    tracing::debug!(package = %submission.metadata.name, "Reporting created package");
    writeln!(out, "package '{}' created", submission.metadata.name)?;
    Ok(())
}

/// Prints a package as pretty JSON.
pub async fn run_get(
    api: &dyn PackageApi,
    namespace: &str,
    name: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let package = api.package_get(&ObjectMeta::new(name, namespace)).await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&package)?)?;
    Ok(())
}

/// Prints one line per package: name, environment and build status.
pub async fn run_list(api: &dyn PackageApi, out: &mut dyn Write) -> Result<()> {
    let packages = api.package_list().await?;
    writeln!(out, "{:<40} {:<20} {}", "NAME", "ENV", "STATUS")?;
    for package in packages {
        writeln!(
            out,
            "{:<40} {:<20} {}",
            package.metadata.name, package.spec.environment.name, package.status.build_status
        )?;
    }
    Ok(())
}

/// Deletes a package.
pub async fn run_delete(
    api: &dyn PackageApi,
    namespace: &str,
    name: &str,
    out: &mut dyn Write,
) -> Result<()> {
    api.package_delete(&ObjectMeta::new(name, namespace)).await?;
    writeln!(out, "package '{name}' deleted")?;
    Ok(())
}
