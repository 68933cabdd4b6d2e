use crate::config::{self, Config};
use crate::events::{AppEvent, LoadGeneration, PlacesBatch};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::wheel::{self, Label, Step, Wheel, WheelStyle};
use crate::gui::window;
use crate::sys::runtime::Services;
use crate::sys::wm::Point;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub struct AppModel {
    pub wheel: Rc<RefCell<Wheel>>,
    pub style: Rc<RefCell<WheelStyle>>,
    pub config: Config,
    pub services: Services,
    pub visible: bool,
    pub show_list: bool,
    pub selection: Option<Label>,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
    pub item_list: gtk::ListBox,
    frame_loop: Rc<Cell<bool>>,
    places_generation: LoadGeneration,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    Click(u32, Point),
    Spin,
    AddItem(String),
    RemoveItem(usize),
    ItemsLoaded(PlacesBatch),
    Refresh,
    Settled,
    ToggleList,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::Spin => AppMsg::Spin,
            AppEvent::Refresh => AppMsg::Refresh,
            AppEvent::AddItem(label) => AppMsg::AddItem(label),
            AppEvent::RemoveItem(index) => AppMsg::RemoveItem(index),
            AppEvent::ItemsLoaded(batch) => AppMsg::ItemsLoaded(batch),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    fn selection_text(&self) -> String {
        match &self.selection {
            Some(label) => format!("You got: {}", label),
            None => "Click the wheel to spin".to_string(),
        }
    }

    fn list_toggle_label(&self) -> &'static str {
        if self.show_list { "Hide list" } else { "Show list" }
    }

    fn seed_items(&self) {
        let mut wheel = self.wheel.borrow_mut();
        for label in &self.config.wheel.items {
            wheel.add_item(label.clone(), None);
        }
    }

    /// Drives the wheel from the frame clock until it comes to rest.
    fn ensure_frame_loop(&self, sender: &ComponentSender<Self>) {
        if self.frame_loop.replace(true) {
            return;
        }

        let wheel = self.wheel.clone();
        let running = self.frame_loop.clone();
        let sender = sender.clone();
        self.drawing_area.add_tick_callback(move |area, _clock| {
            let step = wheel.borrow_mut().tick();
            area.queue_draw();
            match step {
                Step::Moving => glib::ControlFlow::Continue,
                Step::Settled | Step::Halted => {
                    running.set(false);
                    if step == Step::Settled {
                        sender.input(AppMsg::Settled);
                    }
                    glib::ControlFlow::Break
                }
            }
        });
    }

    fn toggle(&mut self, sender: &ComponentSender<Self>) {
        let result = self.wheel.borrow_mut().toggle(&mut rand::thread_rng());
        match result {
            Ok(needs_loop) => {
                self.selection = None;
                if needs_loop {
                    self.ensure_frame_loop(sender);
                }
            }
            Err(e) => log::warn!("Cannot spin: {}", e),
        }
    }

    fn spin(&mut self, sender: &ComponentSender<Self>) {
        let result = self.wheel.borrow_mut().spin();
        match result {
            Ok(needs_loop) => {
                self.selection = None;
                if needs_loop {
                    self.ensure_frame_loop(sender);
                }
            }
            Err(e) => log::warn!("Cannot spin: {}", e),
        }
    }

    fn rebuild_list(&self, sender: &ComponentSender<Self>) {
        while let Some(row) = self.item_list.first_child() {
            self.item_list.remove(&row);
        }

        for (i, item) in self.wheel.borrow().items().iter().enumerate() {
            let row = gtk::Box::new(gtk::Orientation::Horizontal, 8);

            let label = gtk::Label::new(Some(item.label.as_str()));
            label.set_hexpand(true);
            label.set_xalign(0.0);
            label.set_ellipsize(gtk::pango::EllipsizeMode::End);
            label.set_tooltip_text(Some(&format!("{} ({})", item.label, item.color)));

            let remove = gtk::Button::from_icon_name("list-remove-symbolic");
            remove.set_tooltip_text(Some("Remove"));
            let sender = sender.clone();
            remove.connect_clicked(move |_| sender.input(AppMsg::RemoveItem(i)));

            row.append(&label);
            row.append(&remove);
            self.item_list.append(&row);
        }
    }

    fn items_changed(&mut self, sender: &ComponentSender<Self>) {
        self.selection = None;
        self.rebuild_list(sender);
        self.drawing_area.queue_draw();
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Wheel, Config, Services, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Lunchwheel"),
            #[watch]
            set_visible: model.visible,
            add_css_class: "lunchwheel-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Hide);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "lunchwheel-drawing-area",

                    add_controller = gtk::GestureClick {
                        set_button: 0, // Listen to all buttons
                        connect_released[sender] => move |gesture, _, x, y| {
                            sender.input(AppMsg::Click(gesture.current_button(), Point::new(x, y)));
                        }
                    }
                },

                add_overlay = &gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 8,
                    set_halign: gtk::Align::End,
                    set_valign: gtk::Align::Start,
                    set_margin_top: 24,
                    set_margin_end: 24,
                    set_width_request: 260,
                    add_css_class: "lunchwheel-panel",

                    gtk::Label {
                        add_css_class: "lunchwheel-selection",
                        set_wrap: true,
                        #[watch]
                        set_label: &model.selection_text(),
                    },

                    gtk::Entry {
                        set_placeholder_text: Some("Add an option"),
                        connect_activate[sender] => move |entry| {
                            let text = entry.text().trim().to_string();
                            if !text.is_empty() {
                                sender.input(AppMsg::AddItem(text));
                                entry.set_text("");
                            }
                        }
                    },

                    gtk::Box {
                        set_orientation: gtk::Orientation::Horizontal,
                        set_spacing: 8,
                        set_homogeneous: true,

                        gtk::Button {
                            set_label: "Spin",
                            connect_clicked => AppMsg::Spin,
                        },

                        gtk::Button {
                            #[watch]
                            set_label: model.list_toggle_label(),
                            connect_clicked => AppMsg::ToggleList,
                        },
                    },

                    gtk::ScrolledWindow {
                        #[watch]
                        set_visible: model.show_list,
                        set_min_content_height: 240,
                        set_propagate_natural_height: true,

                        #[name = "item_list"]
                        gtk::ListBox {
                            set_selection_mode: gtk::SelectionMode::None,
                        }
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (wheel, config, services, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let mut style = WheelStyle::default();
        style.resize(
            config.wheel.radius,
            config.wheel.label_offset,
            config.wheel.font_size,
        );

        let model = AppModel {
            wheel: Rc::new(RefCell::new(wheel)),
            style: Rc::new(RefCell::new(style)),
            visible: !config.wheel.start_hidden,
            config,
            services,
            show_list: false,
            selection: None,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
            item_list: gtk::ListBox::default(),
            frame_loop: Rc::new(Cell::new(false)),
            places_generation: LoadGeneration::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model.item_list = widgets.item_list.clone();

        let wheel_draw = model.wheel.clone();
        let style_draw = model.style.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let mut style = style_draw.borrow_mut();
                style.fit(width as f64, height as f64);
                if let Err(e) = wheel::draw(cr, &wheel_draw.borrow(), &style, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        model.seed_items();
        model.rebuild_list(&sender);
        model.services.load_places(
            model.config.places.clone(),
            model.places_generation.current(),
        );

        root.set_visible(model.visible);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => {
                let placement = window::place_overlay(&self.root);
                self.visible = true;

                if let Some(center) = placement.center {
                    self.style
                        .borrow_mut()
                        .rescale(center, placement.monitor_height);
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::Hide => {
                self.visible = false;
            }
            AppMsg::Click(btn, point) => {
                if !self.visible {
                    return;
                }
                let inside = self.style.borrow().contains(point);
                if !inside {
                    self.visible = false;
                } else if btn == 1 {
                    self.toggle(&sender);
                }
            }
            AppMsg::Spin => self.spin(&sender),
            AppMsg::AddItem(label) => {
                self.wheel.borrow_mut().add_item(Label::new(label), None);
                self.items_changed(&sender);
            }
            AppMsg::RemoveItem(index) => {
                let removed = self.wheel.borrow_mut().remove_item(index);
                match removed {
                    Ok(item) => {
                        log::info!("Removed '{}'", item.label);
                        self.items_changed(&sender);
                    }
                    Err(e) => log::warn!("Cannot remove item: {}", e),
                }
            }
            AppMsg::ItemsLoaded(batch) => {
                if !self.places_generation.accepts(&batch) {
                    log::debug!(
                        "Dropping {} places from a superseded search",
                        batch.items.len()
                    );
                    return;
                }
                {
                    let mut wheel = self.wheel.borrow_mut();
                    for item in batch.items {
                        wheel.add_item(Label::new(item.label), item.icon);
                    }
                }
                self.items_changed(&sender);
            }
            AppMsg::Refresh => {
                self.wheel.borrow_mut().clear();
                self.seed_items();
                self.items_changed(&sender);
                nearby::location::forget_cached_location();
                let generation = self.places_generation.advance();
                self.services
                    .load_places(self.config.places.clone(), generation);
            }
            AppMsg::Settled => {
                self.selection = self
                    .wheel
                    .borrow()
                    .current_selection()
                    .map(|item| item.label.clone());
            }
            AppMsg::ToggleList => {
                self.show_list = !self.show_list;
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    {
                        let mut wheel = self.wheel.borrow_mut();
                        wheel.set_palette(new_config.wheel.palette.clone());
                        wheel.set_tuning(new_config.spin);
                    }
                    self.style.borrow_mut().resize(
                        new_config.wheel.radius,
                        new_config.wheel.label_offset,
                        new_config.wheel.font_size,
                    );
                    self.config = new_config;
                    self.drawing_area.queue_draw();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}
