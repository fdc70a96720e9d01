//! OpenAPI documentation served at `/api/openapi.json` and browsable under `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use reviewdesk_reports as reports;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ReviewDesk Reports API",
        version = "0.1.0",
        description = "Dashboard chart datasets computed from a tenant's feedback submissions. Requests carry the tenant's bearer token, which is forwarded to the feedback API."
    ),
    paths(
        handlers::health::health,
        handlers::reports::get_summary,
        handlers::reports::get_timeline,
        handlers::reports::get_rating_trend,
        handlers::reports::get_rating_distribution,
    ),
    components(
        schemas(
            reports::ReportSummary,
            reports::DailyCount,
            reports::RatingTrendPoint,
            reports::RatingDistribution,
            reports::DistributionBucket,
            reports::FormCount,
            reports::EmployeeRatingSummary,
            reports::DateRangePreset,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "reports", description = "Submission timeline, rating trend and distribution datasets"),
        (name = "health", description = "Liveness check")
    )
)]
pub struct ApiDoc;
