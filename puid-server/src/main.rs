use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::{error, info};

use serde::{Deserialize, Serialize};
use puid_core::{Chars, Charsets, Puid, PuidConfig};

/// Most identifiers returned by a single `/v1/generate` call.
const MAX_COUNT: usize = 1000;

/// Command line / environment configuration.
#[derive(Parser, Debug)]
#[command(name = "puid-server", about = "Serves probably unique identifiers over HTTP")]
struct Args {
	/// Address to bind.
	#[arg(long, env = "PUID_HOST", default_value = "127.0.0.1")]
	host: String,

	/// Port to bind.
	#[arg(long, env = "PUID_PORT", default_value_t = 5000)]
	port: u16,

	/// Predefined character set.
	#[arg(long, env = "PUID_CHARSET", default_value = "safe64")]
	charset: Charsets,

	/// Custom characters, overrides `--charset`.
	#[arg(long, env = "PUID_CHARS")]
	chars: Option<String>,

	/// Entropy bits per identifier.
	#[arg(long, env = "PUID_BITS", default_value_t = 128.0, conflicts_with_all = ["total", "risk"])]
	bits: f64,

	/// Expected number of identifiers, used with `--risk`.
	#[arg(long, env = "PUID_TOTAL", requires = "risk")]
	total: Option<f64>,

	/// Accepted 1 in `risk` chance of a repeat, used with `--total`.
	#[arg(long, env = "PUID_RISK", requires = "total")]
	risk: Option<f64>,
}

impl Args {
	/// Initial generator configuration.
	fn puid_config(&self) -> PuidConfig {
		let chars: Chars = match &self.chars {
			Some(chars) => chars.as_str().into(),
			None => self.charset.into(),
		};
		match (self.total, self.risk) {
			(Some(total), Some(risk)) => PuidConfig::total_risk(total, risk, chars),
			_ => PuidConfig::bits(self.bits, chars),
		}
	}
}

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	count: Option<usize>,
}

/// Body of the `/v1/info` endpoint
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Info {
	len: usize,
	bits: f64,
	bits_per_char: f64,
	ere: f64,
	charset: String,
}

struct SharedData {
	puid: Puid,
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates `count` identifiers (default 1) from the shared generator,
/// one per line. The lock is held for the whole batch.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let count = query.count.unwrap_or(1);
	if count == 0 || count > MAX_COUNT {
		return HttpResponse::BadRequest().body(format!("count must be between 1 and {MAX_COUNT}"));
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};

	let ids: Result<Vec<String>, _> = (0..count).map(|_| shared_data.puid.generate()).collect();
	match ids {
		Ok(ids) => HttpResponse::Ok().body(ids.join("\n")),
		Err(e) => {
			error!("generation failed: {e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

#[get("/v1/charsets")]
async fn get_charsets() -> impl Responder {
	let names: Vec<&str> = Charsets::ALL.iter().map(|kind| kind.name()).collect();
	HttpResponse::Ok().body(names.join("\n"))
}

#[get("/v1/info")]
async fn get_info(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	let puid = &shared_data.puid;
	HttpResponse::Ok().json(Info {
		len: puid.len(),
		bits: puid.bits(),
		bits_per_char: puid.bits_per_char(),
		ere: puid.ere(),
		charset: puid.charset().to_string(),
	})
}

/// HTTP PUT endpoint `/v1/configure`
///
/// Replaces the shared generator. The previous one keeps serving until the
/// new configuration is validated.
#[put("/v1/configure")]
async fn put_config(data: web::Data<Mutex<SharedData>>, config: web::Json<PuidConfig>) -> impl Responder {
	let puid = match Puid::new(&config) {
		Ok(puid) => puid,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	info!("reconfigured: {puid:?}");
	shared_data.puid = puid;

	HttpResponse::Ok().body("Generator configured successfully")
}

fn routes(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated)
		.service(get_charsets)
		.service(get_info)
		.service(put_config);
}

/// Main entry point for the server.
///
/// Builds the generator from the command line, wraps it in a `Mutex` so
/// each request gets exclusive access, and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let puid = Puid::new(&args.puid_config())
		.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
	info!("serving {} char ids ({:.2} bits) on {}:{}", puid.len(), puid.bits(), args.host, args.port);

	let shared_data = web::Data::new(Mutex::new(SharedData { puid }));

	HttpServer::new(move || {
		App::new()
			.wrap(
				Cors::default()
					.allow_any_origin()
					.allowed_methods(vec!["GET", "PUT"])
					.allow_any_header(),
			)
			.app_data(shared_data.clone())
			.configure(routes)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await
}
