//! services/api/src/web/pages.rs
//!
//! The informational pages behind the login wall. Rendering is deliberately
//! plain: a shared layout and small inline forms that talk to the JSON APIs.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;

use admission_core::domain::Session;

use crate::web::state::AppState;

/// Wraps page content in the shared chrome.
pub(crate) fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title} - BFGI Admissions</title>
</head>
<body>
  <nav>
    <a href="/">Home</a>
    <a href="/courses">Courses</a>
    <a href="/fees">Fees</a>
    <a href="/admission-process">Admission Process</a>
    <a href="/admission">Apply</a>
    <a href="/chatbot">Chatbot</a>
    <a href="/recommend">Recommend</a>
    <a href="/profile">Profile</a>
    <a href="/logout">Logout</a>
  </nav>
  <main>
{body}
  </main>
</body>
</html>"#
    ))
}

pub(crate) fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// GET /
pub async fn home(Extension(session): Extension<Session>) -> Html<String> {
    layout(
        "Home",
        &format!(
            "<h2>Welcome, {}</h2>\n<p>Baba Farid Group of Institutions admission portal. \
             Browse courses and fees, chat with the admission assistant, or submit an \
             application.</p>",
            escape_html(&session.username)
        ),
    )
}

/// GET /courses - course list straight from the college information blob.
pub async fn courses(State(state): State<Arc<AppState>>) -> Html<String> {
    knowledge_page(&state, "Courses").await
}

/// GET /fees
pub async fn fees(State(state): State<Arc<AppState>>) -> Html<String> {
    knowledge_page(&state, "Fees").await
}

async fn knowledge_page(state: &AppState, title: &str) -> Html<String> {
    let info = match state.knowledge.load().await {
        Ok(text) => text,
        Err(e) => {
            error!("Could not load college information: {e}");
            "College information is temporarily unavailable.".to_string()
        }
    };
    layout(
        title,
        &format!("<h2>{title}</h2>\n<pre>{}</pre>", escape_html(&info)),
    )
}

/// GET /admission-process
pub async fn admission_process() -> Html<String> {
    layout(
        "Admission Process",
        "<h2>Admission Process</h2>\n<ol>\n  <li>Register an account and log in.</li>\n  \
         <li>Check courses, fees and eligibility, or ask the chatbot.</li>\n  \
         <li>Submit the application form with your chosen course.</li>\n  \
         <li>The admission office contacts you on the mobile number provided.</li>\n</ol>",
    )
}

/// GET /admission - the application form. An optional `course` query
/// parameter pre-fills the course field.
pub async fn admission(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    let course = params.get("course").map(String::as_str).unwrap_or("");
    layout(
        "Apply",
        &format!(
            r#"<h2>Admission Application</h2>
<form id="apply-form">
  <input name="name" placeholder="Full name" required>
  <input name="email" type="email" placeholder="Email" required>
  <input name="mobile" placeholder="Mobile" required>
  <input name="course" placeholder="Course" value="{}" required>
  <button type="submit">Apply</button>
</form>
<p id="msg"></p>
<script>
document.getElementById("apply-form").addEventListener("submit", async (e) => {{
  e.preventDefault();
  const form = new FormData(e.target);
  const res = await fetch("/api/apply", {{
    method: "POST",
    headers: {{"Content-Type": "application/json"}},
    body: JSON.stringify(Object.fromEntries(form)),
  }});
  const data = await res.json();
  document.getElementById("msg").textContent = data.message || data.status;
}});
</script>"#,
            escape_html(course)
        ),
    )
}

/// GET /chatbot
pub async fn chatbot() -> Html<String> {
    layout(
        "Chatbot",
        r#"<h2>Admission Assistant</h2>
<div id="chat-log"></div>
<form id="chat-form">
  <input name="message" id="chat-message" placeholder="Ask about courses, fees, hostel..." required>
  <button type="submit">Send</button>
</form>
<script>
document.getElementById("chat-form").addEventListener("submit", async (e) => {
  e.preventDefault();
  const input = document.getElementById("chat-message");
  const log = document.getElementById("chat-log");
  const text = input.value;
  input.value = "";
  log.innerHTML += "<p><b>You:</b> " + text + "</p>";
  const res = await fetch("/api/chat", {
    method: "POST",
    headers: {"Content-Type": "application/json"},
    body: JSON.stringify({message: text}),
  });
  const data = await res.json();
  log.innerHTML += "<p><b>Assistant:</b> " + data.reply + "</p>";
});
</script>"#,
    )
}

/// GET /recommend
pub async fn recommend() -> Html<String> {
    layout(
        "Recommend",
        r#"<h2>Course Recommendation</h2>
<p>Tell the assistant about your background and interests and it will suggest a course:</p>
<ul>
  <li>After 12th (non-medical): B.Tech or BCA</li>
  <li>After 12th (commerce): B.Com or BBA</li>
  <li>After graduation: MCA or MBA</li>
</ul>
<p>For a personal suggestion, use the <a href="/chatbot">chatbot</a>.</p>"#,
    )
}

/// GET /profile - the logged-in user's own record.
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Response {
    let user = match state.users.find_by_username(&session.username).await {
        Ok(Some(user)) => user,
        // The account was deleted out from under the session.
        Ok(None) => return Redirect::to("/logout").into_response(),
        Err(e) => {
            error!("Failed to read user store: {e}");
            return Redirect::to("/logout").into_response();
        }
    };

    layout(
        "Profile",
        &format!(
            "<h2>Profile</h2>\n<table>\n  <tr><th>Name</th><td>{}</td></tr>\n  \
             <tr><th>Username</th><td>{}</td></tr>\n  <tr><th>Email</th><td>{}</td></tr>\n  \
             <tr><th>Mobile</th><td>{}</td></tr>\n  <tr><th>Role</th><td>{}</td></tr>\n</table>",
            escape_html(&user.name),
            escape_html(&user.username),
            escape_html(&user.email),
            escape_html(&user.mobile),
            user.role.as_str()
        ),
    )
    .into_response()
}
