//! Plan command implementation for the Wayfarer CLI.

use std::io::Write;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wayfarer_core::{
    DistanceProvider, Exporter, FeatureTable, Geocoder, TourKind, TourPlan, TourPlanner,
};
use wayfarer_data::geocode::{DEFAULT_NOMINATIM_URL, HttpGeocoder, HttpGeocoderConfig};
use wayfarer_data::gpkg::{DEFAULT_LAYER, GeoPackageExporter};
use wayfarer_data::routing::{
    DEFAULT_PROFILE, HttpDistanceProvider, HttpDistanceProviderConfig, MatrixStrategy,
};

use crate::engine::SolverSettings;
use crate::{
    ARG_COUNTRY_CODES, ARG_GEOCODER_URL, ARG_JSON, ARG_LAYER, ARG_ORIGIN, ARG_OSRM_URL,
    ARG_OUTPUT, ARG_PARALLEL, ARG_PROFILE, ARG_REQUEST_TIMEOUT, ARG_ROUND_TRIP, ARG_STOP,
    ARG_STOPS_FILE, ARG_TABLE, ARG_TIME_LIMIT, CliError, ENV_ORIGIN,
};

/// Default HTTP timeout for routing and geocoding requests.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan the shortest tour from an origin through every stop. \
                 Places are geocoded with Nominatim unless given as \
                 \"lat, long\" literals, and road distances come from an \
                 OSRM server. Options can also be set in configuration files \
                 or WAYFARER_* environment variables.",
    about = "Plan an optimal tour through a list of places"
)]
#[ortho_config(prefix = "WAYFARER")]
pub(crate) struct PlanArgs {
    /// Starting place: an address, a place name or "lat, long".
    #[arg(long = ARG_ORIGIN, value_name = "place")]
    #[serde(default)]
    pub(crate) origin: Option<String>,
    /// A place to visit; repeat for each stop.
    #[arg(long = ARG_STOP, value_name = "place")]
    #[serde(default)]
    pub(crate) stops: Vec<String>,
    /// File listing one stop per line; blank lines and `#` comments are skipped.
    #[arg(long = ARG_STOPS_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) stops_file: Option<Utf8PathBuf>,
    /// Return to the origin after the last stop.
    #[arg(long = ARG_ROUND_TRIP)]
    #[serde(default)]
    pub(crate) round_trip: bool,
    /// Base URL of the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_url: Option<String>,
    /// OSRM routing profile.
    #[arg(long = ARG_PROFILE, value_name = "name")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Fetch all distances with one OSRM table request.
    #[arg(long = ARG_TABLE)]
    #[serde(default)]
    pub(crate) table: bool,
    /// Base URL of the Nominatim server.
    #[arg(long = ARG_GEOCODER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoder_url: Option<String>,
    /// Restrict geocoding to these ISO country codes (comma separated).
    #[arg(long = ARG_COUNTRY_CODES, value_name = "codes")]
    #[serde(default)]
    pub(crate) country_codes: Option<String>,
    /// Timeout for each HTTP request, in seconds.
    #[arg(long = ARG_REQUEST_TIMEOUT, value_name = "secs")]
    #[serde(default)]
    pub(crate) request_timeout_secs: Option<u64>,
    /// Also write the route to this GeoPackage file.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Layer name inside the GeoPackage.
    #[arg(long = ARG_LAYER, value_name = "name")]
    #[serde(default)]
    pub(crate) layer: Option<String>,
    /// Print the route as JSON instead of text.
    #[arg(long = ARG_JSON)]
    #[serde(default)]
    pub(crate) json: bool,
    /// Search first-level branches in parallel.
    #[arg(long = ARG_PARALLEL)]
    #[serde(default)]
    pub(crate) parallel: bool,
    /// Stop the search after this many milliseconds.
    #[arg(long = ARG_TIME_LIMIT, value_name = "ms")]
    #[serde(default)]
    pub(crate) time_limit_ms: Option<u64>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanConfig {
    pub(crate) origin: String,
    /// Stops given directly, before any read from `stops_file`.
    pub(crate) stops: Vec<String>,
    pub(crate) stops_file: Option<Utf8PathBuf>,
    pub(crate) kind: TourKind,
    pub(crate) osrm_url: String,
    pub(crate) profile: String,
    pub(crate) strategy: MatrixStrategy,
    pub(crate) geocoder_url: String,
    pub(crate) country_codes: Option<String>,
    pub(crate) request_timeout: Duration,
    pub(crate) output: Option<Utf8PathBuf>,
    pub(crate) layer: String,
    pub(crate) json: bool,
    pub(crate) solver: SolverSettings,
}

impl PlanConfig {
    /// Every destination: direct stops first, then those from the file.
    pub(crate) fn destinations(&self) -> Result<Vec<String>, CliError> {
        let mut destinations = self.stops.clone();
        if let Some(path) = &self.stops_file {
            require_existing(path, ARG_STOPS_FILE)?;
            let contents =
                wayfarer_fs::read_to_string(path).map_err(|source| CliError::ReadInput {
                    field: ARG_STOPS_FILE,
                    path: path.clone(),
                    source,
                })?;
            destinations.extend(parse_stops(&contents));
        }
        Ok(destinations)
    }

    fn distance_config(&self) -> HttpDistanceProviderConfig {
        HttpDistanceProviderConfig::new(self.osrm_url.clone())
            .with_profile(self.profile.clone())
            .with_timeout(self.request_timeout)
            .with_strategy(self.strategy)
    }

    fn geocoder_config(&self) -> HttpGeocoderConfig {
        let config = HttpGeocoderConfig::new(self.geocoder_url.clone())
            .with_timeout(self.request_timeout);
        match &self.country_codes {
            Some(codes) => config.with_country_codes(codes.clone()),
            None => config,
        }
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let origin = args.origin.ok_or(CliError::MissingArgument {
            field: ARG_ORIGIN,
            env: ENV_ORIGIN,
        })?;
        let osrm_url = args
            .osrm_url
            .unwrap_or_else(|| HttpDistanceProviderConfig::default().base_url);
        let strategy = if args.table {
            MatrixStrategy::Table
        } else {
            MatrixStrategy::Pairwise
        };

        Ok(Self {
            origin,
            stops: args.stops,
            stops_file: args.stops_file,
            kind: TourKind::from_loop(args.round_trip),
            osrm_url,
            profile: args.profile.unwrap_or_else(|| DEFAULT_PROFILE.to_owned()),
            strategy,
            geocoder_url: args
                .geocoder_url
                .unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_owned()),
            country_codes: args.country_codes,
            request_timeout: Duration::from_secs(
                args.request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            output: args.output,
            layer: args.layer.unwrap_or_else(|| DEFAULT_LAYER.to_owned()),
            json: args.json,
            solver: SolverSettings::new(args.parallel, args.time_limit_ms),
        })
    }
}

/// Split a stops file into descriptors.
pub(crate) fn parse_stops(contents: &str) -> impl Iterator<Item = String> + '_ {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match wayfarer_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) if path.as_std_path().exists() => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::ReadInput {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Builds the external services for one `plan` invocation.
pub(crate) trait PlanServices {
    fn distances(&self, config: &PlanConfig) -> Result<Box<dyn DistanceProvider>, CliError>;
    fn geocoder(&self, config: &PlanConfig) -> Result<Box<dyn Geocoder>, CliError>;
}

/// OSRM and Nominatim over HTTP.
pub(crate) struct HttpPlanServices;

impl PlanServices for HttpPlanServices {
    fn distances(&self, config: &PlanConfig) -> Result<Box<dyn DistanceProvider>, CliError> {
        let provider = HttpDistanceProvider::with_config(config.distance_config()).map_err(
            |source| CliError::BuildClient {
                service: "routing",
                base_url: config.osrm_url.clone(),
                source,
            },
        )?;
        Ok(Box::new(provider))
    }

    fn geocoder(&self, config: &PlanConfig) -> Result<Box<dyn Geocoder>, CliError> {
        let geocoder = HttpGeocoder::with_config(config.geocoder_config()).map_err(|source| {
            CliError::BuildClient {
                service: "geocoding",
                base_url: config.geocoder_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(geocoder))
    }
}

pub(crate) fn run_plan_with(
    args: PlanArgs,
    services: &dyn PlanServices,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let plan = execute_plan(&config, services)?;
    if let Some(path) = &config.output {
        export_plan(&plan, path, &config.layer)?;
    }
    write_plan(writer, &plan, config.json)
}

pub(crate) fn execute_plan(
    config: &PlanConfig,
    services: &dyn PlanServices,
) -> Result<TourPlan, CliError> {
    let destinations = config.destinations()?;
    let distances = services.distances(config)?;
    let geocoder = services.geocoder(config)?;
    let solver = config.solver.build();
    let planner = TourPlanner::new(distances.as_ref(), geocoder.as_ref(), solver.as_ref());
    Ok(planner.plan(&config.origin, &destinations, config.kind)?)
}

fn export_plan(plan: &TourPlan, path: &Utf8Path, layer: &str) -> Result<(), CliError> {
    let exporter = GeoPackageExporter::new(path).with_layer(layer);
    exporter
        .export(&FeatureTable::from(&plan.route))
        .map_err(|source| CliError::Export {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

fn write_plan(writer: &mut dyn Write, plan: &TourPlan, json: bool) -> Result<(), CliError> {
    let payload = if json {
        serde_json::to_string_pretty(&plan.route).map_err(CliError::SerialiseOutput)?
    } else {
        plan.route.to_string()
    };
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
