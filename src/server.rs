use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::{Error, ModelError};
use crate::io;
use crate::scheduler::{SchedulingModel, SolverConfig};
use crate::types::SchedulingProblemSolution;

enum JobState {
    Queued,
    Running,
    Done(Result<SchedulingProblemSolution, Error>),
}

type JobMap = Arc<Mutex<HashMap<Uuid, JobState>>>;

/// Shared server state: the job table and the sender feeding the single
/// solver worker. One solve runs at a time; everything else stays queued.
pub struct AppState {
    jobs: JobMap,
    queue: mpsc::UnboundedSender<(Uuid, SchedulingModel)>,
}

impl AppState {
    /// Spawns the worker task; must be called inside a tokio runtime.
    pub fn new(config: SolverConfig) -> Self {
        let jobs: JobMap = Arc::default();
        let (queue, mut receiver) = mpsc::unbounded_channel::<(Uuid, SchedulingModel)>();

        let worker_jobs = Arc::clone(&jobs);
        tokio::spawn(async move {
            while let Some((jobid, model)) = receiver.recv().await {
                worker_jobs
                    .lock()
                    .unwrap()
                    .insert(jobid, JobState::Running);

                let worker_config = config.clone();
                let result =
                    match tokio::task::spawn_blocking(move || model.solve(&worker_config)).await {
                        Ok(result) => result,
                        Err(join_error) => Err(ModelError::Solver(join_error.to_string()).into()),
                    };

                info!("job {jobid} finished (ok: {})", result.is_ok());
                worker_jobs
                    .lock()
                    .unwrap()
                    .insert(jobid, JobState::Done(result));
            }
        });

        AppState { jobs, queue }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/solve", post(solve_handler))
        .route("/api/v1/solution/:jobid", get(solution_handler))
        .with_state(state)
}

pub async fn run_server(host: &str, port: u16) -> std::io::Result<()> {
    let state = Arc::new(AppState::new(SolverConfig::default()));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!("server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}

async fn solve_handler(
    State(state): State<Arc<AppState>>,
    body: String,
) -> (StatusCode, Json<Value>) {
    let problem = match io::import_problem_str(&body) {
        Ok(problem) => problem,
        Err(error) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": error.to_string() })),
            );
        }
    };

    let model = match SchedulingModel::new(problem) {
        Ok(model) => model,
        Err(error) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": error.to_string() })),
            );
        }
    };

    let jobid = Uuid::new_v4();
    state.jobs.lock().unwrap().insert(jobid, JobState::Queued);

    if state.queue.send((jobid, model)).is_err() {
        state.jobs.lock().unwrap().remove(&jobid);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "solver worker is gone" })),
        );
    }

    info!("job {jobid} queued");
    (StatusCode::OK, Json(json!({ "jobid": jobid.to_string() })))
}

async fn solution_handler(
    State(state): State<Arc<AppState>>,
    Path(jobid): Path<String>,
) -> (StatusCode, Json<Value>) {
    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Job not found or removed from cache" })),
        )
    };

    let Ok(jobid) = jobid.parse::<Uuid>() else {
        return not_found();
    };

    let mut jobs = state.jobs.lock().unwrap();
    match jobs.remove(&jobid) {
        None => not_found(),
        Some(JobState::Queued) => {
            jobs.insert(jobid, JobState::Queued);
            (StatusCode::OK, Json(json!({ "status": "Queued" })))
        }
        Some(JobState::Running) => {
            jobs.insert(jobid, JobState::Running);
            (StatusCode::OK, Json(json!({ "status": "Running" })))
        }
        // Finished jobs are consumed by the first read.
        Some(JobState::Done(Ok(solution))) => (
            StatusCode::OK,
            Json(json!({ "schedules": io::solution_to_json(&solution) })),
        ),
        Some(JobState::Done(Err(error))) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        ),
    }
}
