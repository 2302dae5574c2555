use leptos::prelude::*;
use leptos_router::components::{Router, Route, Routes, A};
use leptos_router::path;

mod api;
mod types;
mod components;

use components::assets_page::AssetsPage;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <div class="flex h-screen bg-gray-100">
                // Sidebar
                <div class="w-56 bg-gray-800 text-white p-4 flex flex-col">
                    <h1 class="text-2xl font-bold mb-8">"Atrium"</h1>
                    <nav class="space-y-1 flex-1">
                        <NavLink href="/assets" label="Assets" />
                    </nav>
                    <div class="text-xs text-gray-500 mt-4">
                        "Atrium Asset Console"
                    </div>
                </div>

                // Main Content
                <div class="flex-1 overflow-y-auto">
                    <Routes fallback=|| "Not found.">
                        <Route path=path!("/") view=AssetsPage/>
                        <Route path=path!("/assets") view=AssetsPage/>
                        <Route path=path!("/assets/:edit") view=AssetsPage/>
                        <Route path=path!("/assets/:edit/:id") view=AssetsPage/>
                    </Routes>
                </div>
            </div>
        </Router>
    }
}

#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A href=href attr:class="block p-2 hover:bg-gray-700 rounded transition-colors">
            {label}
        </A>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(App);
}
