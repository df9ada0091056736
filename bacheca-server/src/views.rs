use bacheca_core::Message;

/// Pagina principale: form di inserimento e lista dei messaggi.
pub fn render_index(messages: &[Message]) -> String {
    let mut items = String::new();
    for m in messages {
        items.push_str(&format!(
            r#"      <li id="message-{id}">
        <span class="text">{text}</span>
        <form method="post" action="/edit/{id}" class="inline">
          <input type="text" name="updated_message" value="{text}" required>
          <button type="submit">Edit</button>
        </form>
        <form method="post" action="/delete/{id}" class="inline">
          <button type="submit">Delete</button>
        </form>
      </li>
"#,
            id = m.id,
            text = escape_html(&m.text),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Bacheca</title>
    <style>form.inline {{ display: inline; }}</style>
  </head>
  <body>
    <h1>Bacheca</h1>
    <form method="post" action="/submit">
      <input type="text" name="new_message" placeholder="Write a message" required>
      <button type="submit">Post</button>
    </form>
    <ul id="messages">
{items}    </ul>
  </body>
</html>
"#
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
