//! This file defines the templates and a convenience function for creating the navigation bar.

use maud::{Markup, html};

use crate::{
    endpoints,
    preferences::{Theme, theme_toggle},
};

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_desktop_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
    theme: Theme,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str, theme: Theme) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::ROOT,
                title: "Lançamentos",
                is_current: active_endpoint == endpoints::ROOT,
            },
            Link {
                url: endpoints::DASHBOARD_VIEW,
                title: "Dashboard",
                is_current: active_endpoint == endpoints::DASHBOARD_VIEW,
            },
            Link {
                url: endpoints::ANNUAL_VIEW,
                title: "Análise Anual",
                is_current: active_endpoint == endpoints::ANNUAL_VIEW,
            },
        ];

        NavBar { links, theme }
    }

    pub fn into_html(self) -> Markup {
        let bottom_link_class = |is_current: bool| -> &'static str {
            if is_current {
                "flex w-full min-w-0 items-center justify-center rounded-lg \
                bg-blue-50 px-2.5 py-2 text-xs font-semibold leading-tight \
                text-blue-700 shadow-sm sm:px-4 sm:text-sm \
                dark:bg-blue-900/30 dark:text-blue-200"
            } else {
                "flex w-full min-w-0 items-center justify-center rounded-lg \
                px-2.5 py-2 text-xs font-semibold leading-tight text-gray-600 \
                sm:px-4 sm:text-sm \
                hover:bg-blue-50/70 hover:text-blue-700 dark:text-gray-300 \
                dark:hover:bg-blue-900/20 dark:hover:text-blue-200"
            }
        };

        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::ROOT)
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "GestorBot"
                        }
                    }

                    div class="flex items-center gap-6"
                    {
                        div class="hidden w-full lg:block lg:w-auto"
                        {
                            ul
                                class="font-medium flex flex-col p-4 lg:p-0 mt-4
                                border border-gray-100 rounded bg-gray-50
                                lg:flex-row lg:space-x-8 rtl:space-x-reverse lg:mt-0
                                lg:border-0 lg:bg-white dark:bg-gray-800
                                lg:dark:bg-gray-900 dark:border-gray-700"
                            {
                                @for link in self.links.clone().into_iter() {
                                    li { (link.into_desktop_html()) }
                                }
                            }
                        }

                        (theme_toggle(self.theme))
                    }
                }
            }

            nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden"
            {
                div class="mx-auto max-w-screen-xl px-4 pb-4"
                {
                    div
                        class="rounded-xl border border-gray-200 bg-white/95
                        shadow-lg backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                    {
                        ul
                            class="grid grid-cols-3 gap-2 px-4 py-3 text-xs font-semibold
                            text-gray-600 dark:text-gray-300"
                            aria-label="Principal"
                        {
                            @for link in self.links.iter() {
                                li class="min-w-0" {
                                    a
                                        href=(link.url)
                                        class=(bottom_link_class(link.is_current))
                                        aria-current=[link.is_current.then_some("page")]
                                    {
                                        span class="truncate" { (link.title) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        )
    }
}
