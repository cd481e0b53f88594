//! 浏览器访问 `/r/{code}` 时的 HTML 页面
//!
//! 跳转在浏览器端完成：meta refresh 兜底，脚本负责倒计时显示。

use std::fmt::Write;

use super::PresentationState;
use crate::content::ContentType;

const STYLE: &str = "body{margin:0;min-height:100vh;display:flex;align-items:center;\
justify-content:center;background:#f9fafb;font-family:system-ui,-apple-system,sans-serif;color:#111827}\
.card{background:#fff;border-radius:12px;box-shadow:0 1px 3px rgba(0,0,0,.1);padding:32px;\
max-width:420px;width:100%;text-align:center}\
h1{font-size:1.25rem;margin:0 0 8px}p{color:#4b5563}\
.dest{font-size:.875rem;color:#6b7280;word-break:break-all;margin-bottom:24px}\
pre{text-align:left;white-space:pre-wrap;word-break:break-all;background:#f3f4f6;padding:12px;border-radius:8px}\
.btn{display:inline-block;background:#2563eb;color:#fff;border:0;border-radius:8px;padding:10px 20px;\
font-size:1rem;text-decoration:none;cursor:pointer;margin:4px}";

/// HTML 转义（文本与属性值通用）
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 嵌入 `<script>` 的 JS 字符串字面量
fn js_string(input: &str) -> String {
    serde_json::to_string(input)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

fn layout(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<meta name=\"robots\" content=\"noindex\">\n{head_extra}<title>{title}</title>\n\
<style>{STYLE}</style>\n</head>\n<body>\n<main class=\"card\">\n{body}</main>\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

pub fn render(state: &PresentationState) -> String {
    match state {
        PresentationState::Loading => layout(
            "Processing QR Code...",
            "",
            "<h1>Processing QR Code...</h1>\n<p>Please wait while we redirect you</p>\n",
        ),
        PresentationState::Error { reason } => render_error(reason),
        PresentationState::Redirecting {
            destination,
            countdown,
        } => render_redirect(destination, *countdown),
        PresentationState::Displaying {
            content_type,
            content,
        } => render_display(*content_type, content),
    }
}

fn render_error(reason: &str) -> String {
    let body = format!(
        "<h1>QR Code Error</h1>\n<p>{}</p>\n<a class=\"btn\" href=\"/\">Go to Home</a>\n",
        escape_html(reason)
    );
    layout("QR Code Error", "", &body)
}

fn render_redirect(destination: &str, countdown: u32) -> String {
    let dest_attr = escape_html(destination);
    let head = format!(
        "<meta http-equiv=\"refresh\" content=\"{};url={}\">\n",
        countdown, dest_attr
    );

    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>Redirecting...</h1>\n\
<p>You will be redirected in <span id=\"countdown\">{countdown}</span> seconds</p>\n\
<div class=\"dest\">Destination: {dest_text}</div>\n\
<a class=\"btn\" id=\"go\" href=\"{dest_attr}\" rel=\"noopener noreferrer\">Go Now</a>\n",
        dest_text = escape_html(destination),
    );
    let _ = write!(
        body,
        "<script>\n(function(){{var d={dest_js};var n={countdown};\
var el=document.getElementById('countdown');\
if(n<=0){{window.location.replace(d);return;}}\
var t=setInterval(function(){{n-=1;el.textContent=n;\
if(n<=0){{clearInterval(t);window.location.replace(d);}}}},1000);}})();\n</script>\n",
        dest_js = js_string(destination),
    );

    layout("Redirecting...", &head, &body)
}

fn action_link(content_type: ContentType, content: &str) -> Option<(&'static str, &str)> {
    match content_type {
        ContentType::Email if content.starts_with("mailto:") => Some(("Send Email", content)),
        ContentType::Phone if content.starts_with("tel:") => Some(("Call", content)),
        _ => None,
    }
}

fn render_display(content_type: ContentType, content: &str) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>{}</h1>\n<pre id=\"content\">{}</pre>\n",
        display_title(content_type),
        escape_html(content)
    );

    if let Some((label, href)) = action_link(content_type, content) {
        let _ = write!(
            body,
            "<a class=\"btn\" href=\"{}\">{}</a>\n",
            escape_html(href),
            label
        );
    }

    body.push_str(
        "<button class=\"btn\" id=\"copy\" type=\"button\">Copy</button>\n\
<script>\ndocument.getElementById('copy').addEventListener('click',function(){\
var b=this;navigator.clipboard.writeText(document.getElementById('content').textContent)\
.then(function(){b.textContent='Copied!';setTimeout(function(){b.textContent='Copy';},2000);});});\n</script>\n",
    );

    layout(display_title(content_type), "", &body)
}

fn display_title(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Url => "Link",
        ContentType::Text => "Text",
        ContentType::Email => "Email",
        ContentType::Phone => "Phone Number",
        ContentType::Wifi => "WiFi Network",
        ContentType::Contact => "Contact Card",
    }
}
