use axum::response::Html;

const FORM_PAGE: &str = include_str!("../../assets/index.html");

/// The worksheet form: four fields and a generate button.
pub async fn index() -> Html<&'static str> {
    Html(FORM_PAGE)
}
