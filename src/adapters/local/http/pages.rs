use super::AppState;
use crate::application::service::parse_id;
use crate::ports::extractor::MediaExtractor;
use crate::ports::repository::JobRepository;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub async fn index() -> Html<String> {
    Html(
        r#"<!doctype html>
<html>
    <head>
        <title>Media downloader</title>
    </head>
    <body>
        <h1>Download media</h1>
        <form action="/download" method="post">
            <div>
                <label>
                    URL:
                    <input type="url" name="url" required>
                </label>
            </div>
            <div>
                <label><input type="radio" name="download_type" value="video" checked> Video</label>
                <label><input type="radio" name="download_type" value="audio"> Audio (mp3)</label>
            </div>
            <div>
                <input type="submit" value="Download">
            </div>
        </form>
    </body>
</html>
"#
        .to_string(),
    )
}

pub async fn status<R, E>(
    State(state): State<AppState<R, E>>,
    Path(raw_id): Path<String>,
) -> Response
where
    R: JobRepository + 'static,
    E: MediaExtractor + 'static,
{
    let snapshot = match parse_id(&raw_id).and_then(|id| state.service.get_status(&id)) {
        Ok(snapshot) => snapshot,
        Err(_) => return Redirect::to("/").into_response(),
    };

    Html(format!(
        r#"<!doctype html>
<html>
    <head>
        <title>{title}</title>
    </head>
    <body>
        <h1 id="title">{title}</h1>
        <p>Status: <span id="status">{status}</span></p>
        <p>Progress: <span id="progress">{progress}</span>
           Speed: <span id="speed">{speed}</span>
           ETA: <span id="eta">{eta}</span></p>
        <p id="error"></p>
        <p><a id="file" href="/get_file/{id}" hidden>Save file</a></p>
        <script>
            async function poll() {{
                const res = await fetch("/check_status/{id}");
                const job = await res.json();
                for (const key of ["title", "status", "progress", "speed", "eta"]) {{
                    if (job[key] !== undefined) document.getElementById(key).textContent = job[key];
                }}
                if (job.status === "complete") {{
                    document.getElementById("file").hidden = false;
                    return;
                }}
                if (job.status === "error" || job.status === "not_found") {{
                    document.getElementById("error").textContent = job.error || "Job not found";
                    return;
                }}
                setTimeout(poll, 1000);
            }}
            poll();
        </script>
    </body>
</html>
"#,
        id = snapshot.id,
        title = escape(&snapshot.title),
        status = snapshot.status,
        progress = escape(&snapshot.progress),
        speed = escape(&snapshot.speed),
        eta = escape(&snapshot.eta),
    ))
    .into_response()
}
