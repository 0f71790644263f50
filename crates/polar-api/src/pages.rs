//! # Pages
//!
//! Server-rendered HTML for the home page of each flavor.

use crate::state::AppFlavor;
use polar_core::Product;
use std::fmt::Write;

/// Escape text for use in HTML content and attribute values
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

/// Render the home page for a flavor
pub fn home_page(flavor: AppFlavor, products: &[Product]) -> String {
    match flavor {
        AppFlavor::Minimal => minimal_home(products),
        AppFlavor::Showcase => showcase_home(products),
    }
}

fn minimal_home(products: &[Product]) -> String {
    let (checkout_path, param) = AppFlavor::Minimal.checkout_link();

    let mut links = String::new();
    for product in products {
        let _ = write!(
            links,
            r#"
      <a
        href="{href}"
        target="_blank"
        class="block text-center px-4 py-3 border rounded-xl bg-gray-50 hover:bg-gray-100 text-gray-900 transition"
      >
        Buy {name}
      </a>"#,
            href = escape_html(&product.checkout_path(checkout_path, param)),
            name = escape_html(&product.name),
        );
    }

    format!(
        r#"<!doctype html>
<html>
  <head>
    <meta charset="UTF-8" />
    <title>Dashboard</title>
    <script src="https://cdn.tailwindcss.com"></script>
  </head>
  <body class="bg-white flex flex-col items-center justify-center gap-16 min-h-screen">
    <div class="w-[360px] max-w-[90%] flex flex-col gap-3">{links}
    </div>
    <form action="{portal}" method="get" class="flex gap-2">
      <input
        required
        type="email"
        name="email"
        placeholder="Email"
        class="px-4 py-2 text-base border rounded-lg w-[260px] focus:outline-none focus:border-black"
      />
      <button
        type="submit"
        class="px-6 py-2 text-base bg-black text-white rounded-lg hover:opacity-80 transition"
      >
        Continue
      </button>
    </form>
  </body>
</html>
"#,
        links = links,
        portal = AppFlavor::Minimal.portal_path(),
    )
}

const SHOWCASE_STYLE: &str = r#"
      main { max-width: 600px; margin: 40px auto; padding: 20px; font-family: system-ui, sans-serif; }
      h1 { font-size: 2rem; margin-bottom: 8px; }
      .subtitle { color: #666; margin-bottom: 32px; }
      section { margin-bottom: 32px; padding: 20px; border: 1px solid #eee; border-radius: 8px; }
      h2 { font-size: 1.25rem; margin-bottom: 16px; }
      form { display: flex; gap: 8px; }
      input { flex: 1; padding: 10px 12px; border: 1px solid #ddd; border-radius: 4px; font-size: 1rem; }
      button { padding: 10px 20px; background: #000; color: #fff; border: none; border-radius: 4px; cursor: pointer; font-size: 1rem; }
      ul { list-style: none; padding: 0; margin: 0; }
      li { display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #eee; }
      .name { font-weight: 500; }
      .price { color: #666; margin-left: 8px; }
      .checkout { color: #0070f3; text-decoration: none; }
      code { display: inline-block; padding: 8px 12px; background: #f5f5f5; border-radius: 4px; font-family: monospace; }
      .note { color: #666; font-size: 0.9rem; margin-top: 8px; }
"#;

fn showcase_home(products: &[Product]) -> String {
    let (checkout_path, param) = AppFlavor::Showcase.checkout_link();

    let products_html = if products.is_empty() {
        r#"<p class="note">
          No products found. Add products in your
          <a href="https://polar.sh" target="_blank" rel="noopener">Polar dashboard</a>.
        </p>"#
            .to_string()
    } else {
        let mut items = String::from("<ul>");
        for product in products {
            let price = product
                .primary_price()
                .map(|p| format!(r#"<span class="price">{}</span>"#, escape_html(&p.display())))
                .unwrap_or_default();
            let _ = write!(
                items,
                r#"
          <li>
            <span><span class="name">{name}</span>{price}</span>
            <a href="{href}" class="checkout">Checkout &rarr;</a>
          </li>"#,
                name = escape_html(&product.name),
                price = price,
                href = escape_html(&product.checkout_path(checkout_path, param)),
            );
        }
        items.push_str("\n        </ul>");
        items
    };

    format!(
        r#"<!doctype html>
<html>
  <head>
    <meta charset="UTF-8" />
    <title>Polar + Rust</title>
    <style>{style}</style>
  </head>
  <body>
    <main>
      <h1>Polar + Rust</h1>
      <p class="subtitle">A minimal example of Polar payments integration</p>

      <section>
        <h2>Customer Portal</h2>
        <form action="{portal}" method="get">
          <input type="email" name="email" placeholder="Enter your email" required />
          <button type="submit">Access Portal</button>
        </form>
      </section>

      <section>
        <h2>Products</h2>
        {products}
      </section>

      <section>
        <h2>Webhook Endpoint</h2>
        <code>POST /polar/webhooks</code>
        <p class="note">Configure this URL in your Polar dashboard to receive events.</p>
      </section>
    </main>
  </body>
</html>
"#,
        style = SHOWCASE_STYLE,
        portal = AppFlavor::Showcase.portal_path(),
        products = products_html,
    )
}
