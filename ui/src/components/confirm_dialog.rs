//! Ok/cancel confirmation dialog

use leptos::prelude::*;

/// Modal yes/no prompt. The result callback fires exactly once per showing,
/// with `true` for OK and `false` for cancel.
#[component]
pub fn OkCancelDialog(
    #[prop(into)] when: Signal<bool>,
    #[prop(into)] title: Signal<String>,
    #[prop(into)] message: Signal<String>,
    #[prop(into)] on_result: Callback<bool>,
) -> impl IntoView {
    view! {
        <Show when=move || when.get()>
            <div class="fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center z-50">
                <div class="bg-white rounded-lg p-6 max-w-md w-full mx-4">
                    <h3 class="text-lg font-semibold mb-2">{move || title.get()}</h3>
                    <p class="text-sm text-gray-600 mb-6">{move || message.get()}</p>
                    <div class="flex justify-end gap-3">
                        <button
                            class="px-4 py-2 text-gray-600 hover:bg-gray-100 rounded"
                            on:click=move |_| on_result.run(false)
                        >
                            "Cancel"
                        </button>
                        <button
                            class="px-4 py-2 bg-teal-600 text-white rounded hover:bg-teal-700"
                            on:click=move |_| on_result.run(true)
                        >
                            "OK"
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
