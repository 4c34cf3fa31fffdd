use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dealscope_core::config::Settings;
use dealscope_core::context::AppContext;
use dealscope_core::controller::{
    DualSourceController, GenerateOutcome, MarketingSource, OpportunitySource, SummarySource,
    VariantSource,
};
use dealscope_core::domain::{EarningsPeriod, Selection};
use dealscope_core::generate::http::HttpGenerationClient;
use dealscope_core::store::HttpStoreClient;
use dealscope_core::view::{view_for, CategoryView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CategoryArg {
    Opportunity,
    Marketing,
    Summary,
    All,
}

#[derive(Debug, Parser)]
#[command(name = "dealscope_app")]
struct Args {
    /// Company to inspect.
    #[arg(long)]
    company_id: i64,

    /// Organization context. Tailored content requires this.
    #[arg(long)]
    org_id: Option<i64>,

    /// Earnings period (YYYYQn). Defaults to the latest period on record for
    /// the company, falling back to the latest reported calendar quarter.
    #[arg(long)]
    period: Option<String>,

    #[arg(long, value_enum, default_value = "all")]
    category: CategoryArg,

    /// Trigger tailored generation after the initial fetch.
    #[arg(long)]
    generate: bool,

    /// Starting credit balance to mirror locally (display only).
    #[arg(long, default_value_t = 0)]
    credits: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let store = Arc::new(HttpStoreClient::from_settings(&settings)?);
    let generator: Arc<dyn dealscope_core::generate::GenerationClient> =
        Arc::new(HttpGenerationClient::from_settings(&settings)?);

    let period = resolve_period(&store, args.company_id, args.period.as_deref()).await?;
    let selection = Selection::new(args.company_id, args.org_id, period);
    tracing::info!(
        company_id = selection.company_id,
        organization_id = ?selection.organization_id,
        %period,
        "inspecting selection"
    );

    let context = Arc::new(AppContext::new());
    context.set_credit_balance(args.credits);
    context.set_organization(args.org_id);

    let mut events = context.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::info!(?event, "context event");
        }
    });

    let result = match args.category {
        CategoryArg::Opportunity => {
            run_category(
                OpportunitySource::new(store, generator),
                context,
                selection,
                args.generate,
            )
            .await
        }
        CategoryArg::Marketing => {
            run_category(
                MarketingSource::new(store, generator),
                context,
                selection,
                args.generate,
            )
            .await
        }
        CategoryArg::Summary => {
            run_category(
                SummarySource::new(store, generator),
                context,
                selection,
                args.generate,
            )
            .await
        }
        CategoryArg::All => {
            run_category(
                OpportunitySource::new(store.clone(), generator.clone()),
                context.clone(),
                selection,
                args.generate,
            )
            .await?;
            run_category(
                MarketingSource::new(store.clone(), generator.clone()),
                context.clone(),
                selection,
                args.generate,
            )
            .await?;
            run_category(
                SummarySource::new(store, generator),
                context,
                selection,
                args.generate,
            )
            .await
        }
    };

    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
    }
    result
}

async fn resolve_period(
    store: &HttpStoreClient,
    company_id: i64,
    period_arg: Option<&str>,
) -> anyhow::Result<EarningsPeriod> {
    if let Some(s) = period_arg {
        return s.parse().context("invalid --period");
    }

    match store.earnings_periods(company_id).await {
        Ok(periods) if !periods.is_empty() => Ok(periods[0]),
        Ok(_) => Ok(EarningsPeriod::latest_reported(chrono::Utc::now())),
        Err(err) => {
            tracing::warn!(company_id, error = %err, "could not list earnings periods; using latest reported quarter");
            Ok(EarningsPeriod::latest_reported(chrono::Utc::now()))
        }
    }
}

async fn run_category<S>(
    source: S,
    context: Arc<AppContext>,
    selection: Selection,
    generate: bool,
) -> anyhow::Result<()>
where
    S: VariantSource,
    S::Record: serde::Serialize,
{
    let category = source.category();
    let controller = DualSourceController::new(source, context);
    controller.set_selection(selection);

    for toast in controller.refresh().await {
        tracing::warn!(%category, kind = ?toast.kind, "{}", toast.message);
    }
    report(category, &controller, &selection)?;

    if generate {
        match controller.generate_tailored().await {
            GenerateOutcome::Generated { credits_used, toast } => {
                tracing::info!(%category, credits_used, "{}", toast.message);
            }
            GenerateOutcome::AlreadyGenerating => {
                tracing::warn!(%category, "generation already in flight");
            }
            GenerateOutcome::MissingOrganization => {
                tracing::warn!(%category, "pass --org-id to generate tailored content");
            }
            GenerateOutcome::NoSelection | GenerateOutcome::SelectionChanged => {}
            GenerateOutcome::Failed { toast } => {
                tracing::warn!(%category, "{}", toast.message);
            }
        }
        report(category, &controller, &selection)?;
    }

    Ok(())
}

fn report<S>(
    category: dealscope_core::domain::Category,
    controller: &DualSourceController<S>,
    selection: &Selection,
) -> anyhow::Result<()>
where
    S: VariantSource,
    S::Record: serde::Serialize,
{
    let pair = controller.snapshot();
    let view = view_for(
        &pair,
        controller.active_tab(),
        selection.organization_id.is_some(),
    );

    match &view {
        CategoryView::Data { records, tab } => {
            tracing::info!(%category, ?tab, records = records.len(), "rendering data");
            let json = serde_json::to_string_pretty(&records)
                .context("failed to serialize records for display")?;
            println!("{json}");
        }
        CategoryView::NoData => {
            tracing::info!(%category, "there is no data for this selection");
        }
        CategoryView::GenerateCta => {
            tracing::info!(%category, "tailored content not yet generated; pass --generate to create it");
        }
        CategoryView::Loading | CategoryView::Generating => {
            tracing::info!(%category, state = view_kind(&view), "still in flight");
        }
    }
    Ok(())
}

fn view_kind<R>(view: &CategoryView<R>) -> &'static str {
    match view {
        CategoryView::Loading => "loading",
        CategoryView::NoData => "no_data",
        CategoryView::GenerateCta => "generate_cta",
        CategoryView::Generating => "generating",
        CategoryView::Data { .. } => "data",
    }
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
