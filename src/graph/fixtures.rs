//! Fixture graphs shared by unit tests.

use super::{load_str, Graph, SourceFormat};

/// Two pages: public entry `home` navigates to protected `login`.
pub const TWO_PAGE_JSON: &str = r##"{
  "metadata": { "name": "Tiny Site", "baseUrl": "https://tiny.example.com", "version": "0.1" },
  "nodes": [
    {
      "id": "home", "kind": "page", "name": "Home", "description": "Landing page",
      "route": "/", "requiresAuth": false,
      "userFlow": { "entryPoint": true, "nextSteps": ["login"], "actions": [] },
      "elements": []
    },
    {
      "id": "login", "kind": "page", "name": "Login", "description": "sign in page",
      "route": "/login", "requiresAuth": true,
      "elements": [ { "type": "input", "description": "Email", "selector": "#email" } ]
    }
  ],
  "edges": [
    { "from": "home", "to": "login", "kind": "navigation", "trigger": "click_login", "description": "Open sign in" }
  ],
  "authentication": { "required": true, "publicPages": ["home"], "protectedPages": ["login"] }
}"##;

/// Storefront with a diamond (home and products both reach cart), two cycles
/// back to home, two components and one interaction edge.
pub const STOREFRONT_JSON: &str = r##"{
  "metadata": { "name": "Demo Store", "baseUrl": "https://shop.example.com/", "version": "1.0.0" },
  "nodes": [
    {
      "id": "home", "type": "page", "name": "Home", "description": "Landing page with featured items",
      "route": "/", "requiresAuth": false,
      "userFlow": {
        "entryPoint": true,
        "nextSteps": ["products", "login"],
        "actions": ["Browse featured products", "Search the catalogue"]
      },
      "elements": [
        { "type": "input", "description": "Search box", "selector": "#search", "placeholder": "Search products" },
        { "type": "link", "description": "Shop now link", "selector": "a.shop-now", "text": "Shop now" },
        { "type": "banner", "description": "Hero banner" }
      ]
    },
    {
      "id": "products", "type": "page", "name": "Products", "description": "Catalogue listing",
      "route": "/products", "requiresAuth": false,
      "products": [
        { "name": "Laptop", "price": 999.99, "category": "electronics" },
        { "name": "T-Shirt", "price": "25.00", "category": "apparel" },
        { "name": "Headphones", "price": 199, "category": "electronics" }
      ],
      "elements": [
        { "type": "button", "description": "Add to cart", "selector": ".add-to-cart" }
      ]
    },
    {
      "id": "login", "type": "page", "name": "Login", "description": "Sign in page",
      "route": "/login", "requiresAuth": false,
      "userFlow": { "entryPoint": false, "nextSteps": ["account"], "actions": ["Enter credentials", "Submit the form"] },
      "elements": [
        { "type": "input", "description": "Email field", "selector": "#email" },
        { "type": "input", "description": "Password field", "selector": "#password" },
        { "type": "button", "description": "Sign in button", "selector": "button[type=submit]" }
      ]
    },
    {
      "id": "cart", "type": "page", "name": "Cart", "description": "Shopping cart with selected items",
      "route": "/cart", "requiresAuth": false,
      "elements": [ { "type": "button", "description": "Checkout button", "selector": "#checkout-btn" } ]
    },
    {
      "id": "checkout", "type": "page", "name": "Checkout", "description": "Payment and shipping form",
      "route": "/checkout", "requiresAuth": true,
      "elements": [ { "type": "input", "description": "Card number", "selector": "#card-number" } ]
    },
    {
      "id": "account", "type": "page", "name": "Account", "description": "Order history and profile",
      "route": "/account", "requiresAuth": true
    },
    {
      "id": "header", "type": "component", "name": "Site Header", "description": "Top navigation bar",
      "appearsOn": ["home", "products", "cart"], "position": "top",
      "elements": [ { "type": "button", "description": "Cart icon", "selector": "#cart-icon" } ]
    },
    {
      "id": "newsletter", "type": "component", "name": "Newsletter Signup", "description": "Email capture box",
      "appearsOn": ["home"],
      "elements": [ { "type": "input", "description": "Newsletter email" } ]
    }
  ],
  "edges": [
    { "from": "home", "to": "products", "type": "navigation", "trigger": "click_shop_now", "description": "Browse the catalogue" },
    { "from": "home", "to": "login", "type": "navigation", "trigger": "click_login", "description": "Open the sign-in form" },
    { "from": "home", "to": "cart", "type": "navigation", "trigger": "click_cart", "description": "View the cart" },
    { "from": "products", "to": "cart", "type": "navigation", "trigger": "add_to_cart", "description": "Add an item and open the cart" },
    { "from": "cart", "to": "checkout", "type": "navigation", "trigger": "click_checkout", "description": "Proceed to checkout" },
    { "from": "checkout", "to": "home", "type": "navigation", "trigger": "complete_order", "description": "Return home after ordering" },
    { "from": "login", "to": "account", "type": "navigation", "trigger": "submit_login", "description": "Sign in and land on the account page" },
    { "from": "account", "to": "home", "type": "navigation", "trigger": "click_logo", "description": "Back to the landing page" },
    { "from": "header", "to": "cart", "type": "interaction", "trigger": "click_cart_icon", "description": "Opens the cart" }
  ],
  "authentication": {
    "required": true,
    "publicPages": ["home", "products", "login", "cart"],
    "protectedPages": ["checkout", "account"],
    "defaultCredentials": { "email": "test@example.com", "password": "password123" }
  },
  "commonPatterns": {
    "Login Flow": ["Navigate to /login", "Fill #email and #password", "Click the sign in button"],
    "Checkout Flow": ["Add a product to the cart", "Open /cart", "Click #checkout-btn"]
  }
}"##;

pub fn two_page() -> Graph {
    load_str(TWO_PAGE_JSON, SourceFormat::Json).unwrap()
}

pub fn storefront() -> Graph {
    load_str(STOREFRONT_JSON, SourceFormat::Json).unwrap()
}
