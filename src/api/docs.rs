/// Generate Markdown documentation for the catalog API
pub fn generate_markdown_docs(base_url: &str) -> String {
    let mut markdown = String::new();

    // Header
    markdown.push_str("# Product Catalog API Documentation\n\n");
    markdown.push_str("## Overview\n\n");
    markdown.push_str("A REST API for a product catalog: create, read, update and delete products, upload a product image, and browse the catalog with text search, category and price filters, and pagination.\n\n");

    // Table of Contents
    markdown.push_str("## Table of Contents\n\n");
    markdown.push_str("- [Products](#products)\n");
    markdown.push_str("- [Uploaded Images](#uploaded-images)\n");
    markdown.push_str("- [Error Responses](#error-responses)\n\n");

    // Base URL
    markdown.push_str("## Base URL\n\n");
    markdown.push_str(&format!("```\n{}/api\n```\n\n", base_url));

    // Product endpoints
    markdown.push_str("## Products\n\n");

    markdown.push_str("### GET /api/products\n\n");
    markdown.push_str("**Description:** List products, newest first, with optional filters and pagination.\n\n");
    markdown.push_str("**Query Parameters:**\n");
    markdown.push_str("- `search` — free-text match against product name and description\n");
    markdown.push_str("- `category` — comma-separated category list; a product must match at least one\n");
    markdown.push_str("- `minPrice`, `maxPrice` — inclusive price bounds (decimal numbers)\n");
    markdown.push_str("- `page` (default 1), `limit` (default 10) — pagination window\n\n");
    markdown.push_str("**Response:**\n```json\n{\n  \"success\": true,\n  \"data\": [\n    {\n      \"id\": \"uuid\",\n      \"name\": \"Widget\",\n      \"category\": \"Electronics\",\n      \"price\": 19.99,\n      \"description\": \"A widget\",\n      \"image\": \"/uploads/image-1700000000000-123456789.png\",\n      \"createdAt\": \"2024-01-01T00:00:00Z\",\n      \"updatedAt\": \"2024-01-01T00:00:00Z\"\n    }\n  ],\n  \"pagination\": {\n    \"total\": 42,\n    \"page\": 1,\n    \"limit\": 10,\n    \"pages\": 5\n  }\n}\n```\n\n");

    markdown.push_str("### GET /api/products/{id}\n\n");
    markdown.push_str("**Description:** Fetch a single product by id.\n\n");
    markdown.push_str("**Response:**\n```json\n{\n  \"success\": true,\n  \"data\": { \"id\": \"uuid\", \"name\": \"Widget\", \"...\": \"...\" }\n}\n```\n\n");

    markdown.push_str("### POST /api/products\n\n");
    markdown.push_str("**Description:** Create a product (multipart/form-data). Fields `name`, `category`, `price` and `description` are required; `image` is an optional file (image/*, max 5 MiB).\n\n");
    markdown.push_str("**Response (201):**\n```json\n{\n  \"success\": true,\n  \"message\": \"Product created successfully\",\n  \"data\": { \"id\": \"uuid\", \"...\": \"...\" }\n}\n```\n\n");

    markdown.push_str("### PUT /api/products/{id}\n\n");
    markdown.push_str("**Description:** Update a product (multipart/form-data). Any subset of the text fields may be sent; a new `image` file replaces the previous one and the old file is deleted from disk.\n\n");
    markdown.push_str("**Response:**\n```json\n{\n  \"success\": true,\n  \"message\": \"Product updated successfully\",\n  \"data\": { \"id\": \"uuid\", \"...\": \"...\" }\n}\n```\n\n");

    markdown.push_str("### DELETE /api/products/{id}\n\n");
    markdown.push_str("**Description:** Delete a product and its image file.\n\n");
    markdown.push_str("**Response:**\n```json\n{\n  \"success\": true,\n  \"message\": \"Product deleted successfully\"\n}\n```\n\n");

    // Static files
    markdown.push_str("## Uploaded Images\n\n");
    markdown.push_str("Uploaded images are served as static content under the path stored on the product record:\n\n");
    markdown.push_str(&format!(
        "```\n{}/uploads/<filename>\n```\n\n",
        base_url
    ));

    // Errors
    markdown.push_str("## Error Responses\n\n");
    markdown.push_str("All failures share one envelope:\n\n");
    markdown.push_str("```json\n{\n  \"success\": false,\n  \"message\": \"Field 'price' is required\",\n  \"error\": \"optional detail, present on server errors\"\n}\n```\n\n");
    markdown.push_str("| Status | Meaning |\n|---|---|\n");
    markdown.push_str("| 400 | Validation failure: missing field, bad price, rejected upload |\n");
    markdown.push_str("| 404 | No product with the given id |\n");
    markdown.push_str("| 429 | Rate limit exceeded |\n");
    markdown.push_str("| 500 | Database or filesystem failure |\n\n");

    markdown
}

/// Generate the HTML landing page served at /docs
pub fn generate_documentation_html() -> String {
    r#"<!DOCTYPE html>
<html>
<head>
    <title>Product Catalog API Documentation</title>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
            margin: 0;
            background: #f8f9fa;
            color: #212529;
        }

        .container {
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
        }

        .header {
            text-align: center;
            padding: 30px 0;
        }

        .nav-links {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 15px;
            margin-bottom: 30px;
        }

        .nav-link {
            display: block;
            background: white;
            border: 1px solid #e9ecef;
            border-radius: 8px;
            padding: 15px;
            text-decoration: none;
            color: inherit;
        }

        .section {
            background: white;
            border: 1px solid #e9ecef;
            border-radius: 8px;
            padding: 20px;
            margin-bottom: 20px;
        }

        .endpoint {
            border-bottom: 1px solid #e9ecef;
            padding: 15px 0;
        }

        .endpoint:last-child {
            border-bottom: none;
        }

        .method {
            display: inline-block;
            padding: 4px 8px;
            border-radius: 4px;
            font-size: 0.8rem;
            font-weight: bold;
            margin-right: 10px;
        }

        .method.get { background: #28a745; color: white; }
        .method.post { background: #007bff; color: white; }
        .method.put { background: #ffc107; color: black; }
        .method.delete { background: #dc3545; color: white; }

        .endpoint-url {
            font-family: 'Courier New', monospace;
            background: #e9ecef;
            padding: 5px 10px;
            border-radius: 4px;
            font-size: 0.9rem;
        }

        .description {
            margin: 15px 0;
            color: #6c757d;
        }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>🛒 Product Catalog API</h1>
            <p>Product CRUD with image uploads, filtering and pagination</p>
        </div>

        <div class="nav">
            <h2>📚 Quick Access</h2>
            <div class="nav-links">
                <a href="/api/docs" class="nav-link">
                    <h3>🔍 Swagger UI</h3>
                    <p>Interactive API documentation with testing capabilities</p>
                </a>
                <a href="/api/redoc" class="nav-link">
                    <h3>📖 Redoc UI</h3>
                    <p>Clean, responsive API documentation</p>
                </a>
                <a href="/docs/openapi.json" class="nav-link">
                    <h3>📄 OpenAPI JSON</h3>
                    <p>Download the complete OpenAPI specification</p>
                </a>
                <a href="/docs/markdown" class="nav-link">
                    <h3>📝 Markdown</h3>
                    <p>Download documentation as Markdown file</p>
                </a>
            </div>
        </div>

        <div class="section">
            <h2>🛍️ Product Endpoints</h2>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/products</h3>
                <div class="endpoint-url">List products with filters and pagination</div>
                <div class="description">Supports search, category, minPrice, maxPrice, page and limit query parameters. Results are sorted newest first.</div>
            </div>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/products/{id}</h3>
                <div class="endpoint-url">Get a single product</div>
                <div class="description">Returns the product with the given id, or 404 if it does not exist.</div>
            </div>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/products</h3>
                <div class="endpoint-url">Create a product</div>
                <div class="description">multipart/form-data with name, category, price, description and an optional image file (image/*, max 5 MiB).</div>
            </div>

            <div class="endpoint">
                <h3><span class="method put">PUT</span> /api/products/{id}</h3>
                <div class="endpoint-url">Update a product</div>
                <div class="description">multipart/form-data with any subset of the text fields. A new image replaces the previous file.</div>
            </div>

            <div class="endpoint">
                <h3><span class="method delete">DELETE</span> /api/products/{id}</h3>
                <div class="endpoint-url">Delete a product</div>
                <div class="description">Removes the product record and its image file.</div>
            </div>
        </div>

        <div class="section">
            <h2>🖼️ Uploaded Images</h2>
            <div class="endpoint">
                <h3><span class="method get">GET</span> /uploads/{filename}</h3>
                <div class="endpoint-url">Static image content</div>
                <div class="description">Serves the image file referenced by a product's image path.</div>
            </div>
        </div>
    </div>
</body>
</html>
"#
    .to_string()
}
