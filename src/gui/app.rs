//! Main GUI application
//!
//! egui application state and rendering over the latest catalog snapshot.

use std::sync::Arc;
use std::sync::mpsc;

use eframe::egui;

use crate::config::Config;
use crate::core::cache::{CatalogCache, CatalogSnapshot, GroupImages};
use crate::core::catalog::Group;
use crate::core::image::{RemoteImage, TextureQueue};
use crate::core::palette::{self, Rgba};
use crate::core::refresh::{CancelToken, Refresher, RefreshSummary};
use crate::core::registry;
use crate::util::http::HttpTransport;

/// Main launcher application state
pub struct HangarApp {
    /// Snapshot source, read once per frame
    cache: Arc<CatalogCache>,
    /// Images waiting for their GPU upload
    textures: Arc<TextureQueue>,
    /// Refresh driver shared with worker threads
    refresher: Arc<Refresher<HttpTransport>>,
    /// Cancelled on shutdown so in-flight cycles stop early
    cancel: CancelToken,
    /// Channel for receiving async results
    async_receiver: Option<mpsc::Receiver<AsyncResult>>,
    /// Currently selected group key
    selected_group: Option<String>,
    /// Show groups flagged as hidden
    show_hidden: bool,
    /// Error message to display
    error_message: Option<String>,
    /// Status message
    status_message: String,
    /// A refresh cycle is running
    is_refreshing: bool,
}

enum AsyncResult {
    RefreshDone(RefreshSummary),
    RefreshSkipped,
    RefreshFailed(String),
}

impl HangarApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(&config.network)?;
        let cache = Arc::new(CatalogCache::new());
        let textures = Arc::new(TextureQueue::new());
        let refresher = Arc::new(Refresher::new(
            transport,
            config,
            Arc::clone(&cache),
            Arc::clone(&textures),
        ));

        let mut app = Self {
            cache,
            textures,
            refresher,
            cancel: CancelToken::new(),
            async_receiver: None,
            selected_group: None,
            show_hidden: false,
            error_message: None,
            status_message: "Ready".to_string(),
            is_refreshing: false,
        };

        // Mandatory startup refresh; the UI shows a loading state until the
        // first commit.
        app.start_refresh(&cc.egui_ctx);

        Ok(app)
    }

    fn start_refresh(&mut self, ctx: &egui::Context) {
        if self.is_refreshing {
            return;
        }
        self.is_refreshing = true;
        self.status_message = "Refreshing catalog...".to_string();

        let (tx, rx) = mpsc::channel();
        self.async_receiver = Some(rx);

        let ctx = ctx.clone();
        let refresher = Arc::clone(&self.refresher);
        let cancel = self.cancel.clone();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                match refresher.run_cycle(&cancel).await {
                    Ok(Some(summary)) => {
                        let _ = tx.send(AsyncResult::RefreshDone(summary));
                    }
                    Ok(None) => {
                        let _ = tx.send(AsyncResult::RefreshSkipped);
                    }
                    Err(e) => {
                        let _ = tx.send(AsyncResult::RefreshFailed(e.to_string()));
                    }
                }
            });
            ctx.request_repaint();
        });
    }

    fn check_async_results(&mut self) {
        if let Some(rx) = &self.async_receiver {
            if let Ok(result) = rx.try_recv() {
                match result {
                    AsyncResult::RefreshDone(summary) => {
                        self.is_refreshing = false;
                        self.async_receiver = None;
                        self.error_message = None;
                        self.status_message = format!(
                            "Catalog up to date: {} groups, {} images",
                            summary.groups, summary.images_loaded
                        );
                    }
                    AsyncResult::RefreshSkipped => {
                        self.is_refreshing = false;
                        self.async_receiver = None;
                        self.status_message = "Ready".to_string();
                    }
                    AsyncResult::RefreshFailed(e) => {
                        self.is_refreshing = false;
                        self.async_receiver = None;
                        self.error_message = Some(e);
                        self.status_message = "Ready".to_string();
                    }
                }
            }
        }
    }

    /// Keep the selection pointing at a group that exists and is visible.
    fn ensure_selection(&mut self, snapshot: &CatalogSnapshot) {
        let valid = self
            .selected_group
            .as_ref()
            .and_then(|key| snapshot.document.get(key))
            .is_some_and(|group| self.show_hidden || !group.is_hidden());

        if !valid {
            self.selected_group = snapshot
                .document
                .iter()
                .find(|(_, group)| self.show_hidden || !group.is_hidden())
                .map(|(key, _)| key.clone());
        }
    }
}

impl eframe::App for HangarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Install textures decoded since the last frame. Upload must happen
        // here: only this thread owns the graphics context.
        for image in self.textures.drain() {
            image.upload(ctx);
        }

        self.check_async_results();

        let snapshot = self.cache.current();

        // Top panel - Header
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("🛩 hangar");
                ui.separator();

                if ui
                    .add_enabled(!self.is_refreshing, egui::Button::new("🔄 Refresh"))
                    .clicked()
                {
                    self.start_refresh(ctx);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.checkbox(&mut self.show_hidden, "Show hidden");
                });
            });
        });

        // Bottom panel - Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(err) = &self.error_message {
                    ui.colored_label(egui::Color32::RED, format!("❌ {}", err));
                    if ui.small_button("✕").clicked() {
                        self.error_message = None;
                    }
                } else if self.is_refreshing {
                    ui.spinner();
                    ui.label(&self.status_message);
                } else {
                    ui.label(&self.status_message);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("v{}", env!("CARGO_PKG_VERSION")));
                });
            });
        });

        match snapshot {
            Some(snapshot) => {
                self.ensure_selection(&snapshot);
                self.show_catalog(ctx, &snapshot);
            }
            None => self.show_loading(ctx),
        }

        // Request repaint while waiting
        if self.is_refreshing {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Stop any in-flight refresh; the cache simply keeps its last
        // snapshot.
        self.cancel.cancel();
    }
}

impl HangarApp {
    /// Loading state before the first commit. On a failed first refresh this
    /// stays up until the user retries.
    fn show_loading(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                if self.is_refreshing {
                    ui.spinner();
                    ui.add_space(10.0);
                    ui.label("Fetching catalog...");
                } else {
                    ui.label("No catalog loaded.");
                    ui.add_space(10.0);
                    if ui.button("🔄 Retry").clicked() {
                        self.start_refresh(ctx);
                    }
                }
            });
        });
    }

    fn show_catalog(&mut self, ctx: &egui::Context, snapshot: &CatalogSnapshot) {
        // Group list
        egui::SidePanel::left("groups")
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Groups");
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (key, group) in &snapshot.document {
                        if group.is_hidden() && !self.show_hidden {
                            continue;
                        }

                        let is_selected = self.selected_group.as_deref() == Some(key.as_str());
                        let label = if group.is_hidden() {
                            format!("{} (hidden)", group.name)
                        } else {
                            group.name.clone()
                        };
                        if ui.selectable_label(is_selected, label).clicked() {
                            self.selected_group = Some(key.clone());
                        }
                    }
                });
            });

        // Central panel - selected group
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(key) = self.selected_group.clone() else {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.label("No groups to display.");
                });
                return;
            };

            if let (Some(group), images) =
                (snapshot.document.get(&key), snapshot.group_images(&key))
            {
                show_group(ui, group, images);
            }
        });
    }
}

fn show_group(ui: &mut egui::Ui, group: &Group, images: Option<&GroupImages>) {
    ui.horizontal(|ui| {
        if let Some(logo) = images.and_then(|images| images.logo.as_ref()) {
            draw_image(ui, logo, 48.0);
        }
        ui.heading(&group.name);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            palette_swatches(ui, &group.palette);
        });
    });
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (index, project) in group.projects.iter().enumerate() {
            let project_images = images.and_then(|images| images.projects.get(index));

            ui.add_space(8.0);
            egui::Frame::group(ui.style()).show(ui, |ui| {
                if let Some(background) =
                    project_images.and_then(|slots| slots.background.as_ref())
                {
                    draw_image(ui, background, 140.0);
                }

                ui.horizontal(|ui| {
                    ui.strong(&project.name);
                    ui.label(format!("v{}", project.version));
                    if let Some(date) = project.release_date() {
                        ui.weak(date.format("%Y-%m-%d").to_string());
                    }
                    if let Some(code) = registry::code_for(&group.name, &project.name) {
                        ui.weak(format!("#{}", code));
                    }
                });

                if !project.overview.is_empty() {
                    ui.label(&project.overview);
                }

                if let Some(variants) = &project.variants {
                    ui.horizontal_wrapped(|ui| {
                        ui.weak("Variants:");
                        for variant in variants {
                            ui.label(variant);
                        }
                    });
                }

                if !project.changelog.is_empty() {
                    ui.collapsing("Changelog", |ui| {
                        ui.label(&project.changelog);
                    });
                }

                if let Some(package) = &project.package {
                    ui.weak(format!(
                        "Package: {}/{} {} ({})",
                        package.owner, package.repo_name, package.version, package.file_name
                    ));
                }
            });
        }

        if let Some(beta) = images.and_then(|images| images.beta_background.as_ref()) {
            ui.add_space(8.0);
            ui.collapsing("Beta program", |ui| {
                draw_image(ui, beta, 140.0);
            });
        }
    });
}

/// Draw an image scaled to `height`, if its texture is already installed.
fn draw_image(ui: &mut egui::Ui, image: &RemoteImage, height: f32) {
    if let Some(texture) = image.texture() {
        let scale = height / image.height().max(1) as f32;
        let size = egui::vec2(image.width() as f32 * scale, height);
        ui.image(egui::load::SizedTexture::new(texture.id(), size));
    }
}

fn palette_swatches(ui: &mut egui::Ui, palette: &crate::core::catalog::Palette) {
    let colors = palette::resolve_lenient(palette);

    let mut swatches = vec![colors.primary, colors.secondary];
    swatches.extend(colors.circles);

    for color in swatches.into_iter().rev() {
        let (rect, _) =
            ui.allocate_exact_size(egui::vec2(18.0, 18.0), egui::Sense::hover());
        ui.painter().rect_filled(rect, 3.0, color32(color));
    }
}

fn color32(color: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(
        (color.r * 255.0).round() as u8,
        (color.g * 255.0).round() as u8,
        (color.b * 255.0).round() as u8,
        (color.a * 255.0).round() as u8,
    )
}
