use anyhow::Context;
use clap::Parser;
use markify_pseo::config::Command;
use markify_pseo::core::ConfigProvider;
use markify_pseo::utils::{logger, validation::Validate};
use markify_pseo::{
    CliConfig, GenerationEngine, LocalStorage, MarkifyError, PageGenerator, RouteQuery,
    SiteConfig, SitePipeline,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(&cli).await {
        let Some(err) = e.downcast_ref::<MarkifyError>() else {
            tracing::error!("{:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        };

        tracing::error!(
            "{:#} (Category: {:?}, Severity: {:?})",
            e,
            err.category(),
            err.severity()
        );
        eprintln!("❌ {}", err.user_friendly_message());
        eprintln!("💡 {}", err.recovery_suggestion());

        std::process::exit(err.severity().exit_code());
    }
}

async fn run(cli: &CliConfig) -> anyhow::Result<()> {
    let config = cli.site_config()?;
    config.validate()?;

    let catalog = config.load_catalog().context("failed to load catalog")?;
    let generator = Arc::new(PageGenerator::new(catalog));

    match &cli.command {
        Command::Routes {
            limit,
            offset,
            intent,
            industry,
            json,
        } => list_routes(&generator, *limit, *offset, intent, industry, *json)?,
        Command::Page { intent, industry } => print_page(&generator, intent, industry)?,
        Command::Export { dry_run: true, .. } => print_dry_run(&generator, &config),
        Command::Export { .. } => export(generator, config).await?,
        Command::Validate => {
            let catalog = generator.catalog();
            println!(
                "✅ Configuration and catalog are valid: {} intents, {} industries, {} pages",
                catalog.intents().len(),
                catalog.industries().len(),
                generator.route_iter().count()
            );
        }
    }

    Ok(())
}

fn list_routes(
    generator: &PageGenerator,
    limit: Option<i64>,
    offset: Option<i64>,
    intent: &Option<String>,
    industry: &Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    if let Some(intent) = intent {
        if generator.intent_by_slug(intent).is_none() {
            return Err(not_found("intent", intent).into());
        }
        for allowed in generator.industries_for_intent(intent) {
            println!("{}\t{}", allowed.slug, allowed.name);
        }
        return Ok(());
    }

    if let Some(industry) = industry {
        if generator.industry_by_slug(industry).is_none() {
            return Err(not_found("industry", industry).into());
        }
        for allowed in generator.intents_for_industry(industry) {
            println!("{}\t{}", allowed.slug, allowed.title);
        }
        return Ok(());
    }

    let routes = generator.routes(RouteQuery { limit, offset });
    if json {
        println!("{}", serde_json::to_string_pretty(&routes)?);
    } else {
        for route in &routes {
            println!("{}", route.path);
        }
    }
    tracing::debug!("Listed {} routes", routes.len());
    Ok(())
}

fn print_page(generator: &PageGenerator, intent_slug: &str, industry_slug: &str) -> anyhow::Result<()> {
    let intent = generator
        .intent_by_slug(intent_slug)
        .ok_or_else(|| not_found("intent", intent_slug))?;
    let industry = generator
        .industry_by_slug(industry_slug)
        .ok_or_else(|| not_found("industry", industry_slug))?;

    // An excluded pair is a 404, same as an unknown slug.
    let page = generator
        .build_page(Some(intent), Some(industry))
        .ok_or_else(|| not_found("use case", &format!("{}/{}", intent.slug, industry.slug)))?;

    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

fn print_dry_run(generator: &PageGenerator, config: &SiteConfig) {
    let routes = generator.routes(config.route_query());

    println!("📋 Export Summary:");
    println!("  Site: {} ({})", config.site_name(), config.base_url());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if let Some(archive) = config.archive_name() {
        println!("  Archive: {}", archive);
    }
    println!("  Pages: {}", routes.len());
    for route in routes.iter().take(10) {
        println!("    {}", route.path);
    }
    if routes.len() > 10 {
        println!("    ... and {} more", routes.len() - 10);
    }
}

async fn export(generator: Arc<PageGenerator>, config: SiteConfig) -> anyhow::Result<()> {
    let storage = LocalStorage::new(config.output_path());
    let pipeline = SitePipeline::new(storage, config, generator);
    let engine = GenerationEngine::new(pipeline);

    let output_path = engine.run().await?;
    println!("✅ Export completed: {}", output_path);
    Ok(())
}

fn not_found(kind: &str, slug: &str) -> MarkifyError {
    MarkifyError::NotFound {
        kind: kind.to_string(),
        slug: slug.to_string(),
    }
}
