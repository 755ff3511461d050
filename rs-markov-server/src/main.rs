use std::io;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};

use serde::Deserialize;
use rs_markov_core::io::list_files;
use rs_markov_core::model::language_model::LanguageModel;

/// Window length of the shared model.
/// Currently hardcoded; should be made configurable.
const WINDOW_LENGTH: usize = 7;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	start: String,
	length: Option<usize>,
}

#[derive(Deserialize)]
struct TrainQuery {
	name: Option<String>
}

struct SharedData {
	model: LanguageModel
}

/// HTTP GET endpoint `/v1/generate`
///
/// Extends the `start` text by `length` characters sampled from the shared
/// model. Returns the extended text as the response body; if the start text
/// is shorter than the window or ends in an unseen window, the body is the
/// start text unchanged.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let length = query.length.unwrap_or(100);

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	HttpResponse::Ok().body(shared_data.model.generate(&query.start, length))
}

/// HTTP PUT endpoint `/v1/train`
///
/// Trains the shared model on `./data/<name>.txt`. Training is cumulative:
/// repeated calls add counts on top of what the model already learned.
#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<SharedData>>, query: web::Query<TrainQuery>) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let corpus_path = format!("./data/{}.txt", name);
	match shared_data.model.train(&corpus_path) {
		Ok(_) => HttpResponse::Ok().body(format!("Trained on {}", corpus_path)),
		Err(e) => HttpResponse::InternalServerError().body(format!("Failed to train: {e}")),
	}
}

#[get("/v1/corpora")]
async fn get_corpora() -> impl Responder {
	match list_files("./data", "txt") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".txt", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora")
	}
}

/// HTTP GET endpoint `/v1/dump`
///
/// Human-readable dump of the context map (window : distribution), one
/// window per line. Debugging aid.
#[get("/v1/dump")]
async fn get_dump(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.model.to_string())
}

/// Main entry point for the server.
///
/// Builds an untrained model, wraps it in a `Mutex` for thread safety,
/// and starts an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - The corpus directory is hardcoded to `./data`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	let shared_data = SharedData {
		model: LanguageModel::new(WINDOW_LENGTH).map_err(io::Error::other)?,
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(get_generated)
			.service(put_train)
			.service(get_corpora)
			.service(get_dump)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
