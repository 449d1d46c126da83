//! Screen view models, their pure composition into draw commands, and the
//! single executor that applies a command list to a [`DisplaySurface`].

use core::fmt::{self, Write as _};

use heapless::{String, Vec};
use log::warn;

use crate::{
    calendar::CalendarFields,
    display::{Align, CENTER_X, Color, DisplaySurface, Font, HEIGHT, LINES, WIDTH},
    redraw::RedrawAction,
    uptime::UpTimeParts,
};

pub const TEXT_CAPACITY: usize = 32;
pub const MAX_COMMANDS: usize = 16;

pub type Text = String<TEXT_CAPACITY>;
pub type DrawList = Vec<DrawCommand, MAX_COMMANDS>;

const TIME_RIGHT_X: i32 = 96;
const SECONDS_X: i32 = 98;
const SECONDS_Y: i32 = 21;
const SECONDS_HEIGHT: u32 = 17;
const DATE_Y: i32 = HEIGHT as i32 - 18;

const PROGRESS_X: i32 = 5;
const PROGRESS_Y: i32 = HEIGHT as i32 - 16;
const PROGRESS_WIDTH: u32 = WIDTH - 10;
const PROGRESS_HEIGHT: u32 = 14;

const COMPARE_TITLE: &str = "Compare Time";
const SYNC_TITLE: &str = "Get Server Time";

/// Which network task a screen belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NetTask {
    Compare,
    Sync,
}

impl NetTask {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Compare => COMPARE_TITLE,
            Self::Sync => SYNC_TITLE,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Screen<'a> {
    Splash {
        version: &'a str,
    },
    Clock {
        fields: CalendarFields,
        redraw: RedrawAction,
    },
    /// Before the first candidate is tried.
    JoinStart {
        refresh: bool,
    },
    Connecting {
        label: &'a str,
    },
    BootWifi {
        connected: bool,
    },
    NoWifi,
    Fetching {
        task: NetTask,
        percent: u8,
    },
    CompareResult {
        difference_secs: i64,
    },
    SyncResult {
        hour: u8,
        minute: u8,
    },
    InvalidData {
        task: NetTask,
    },
    UpTime(UpTimeParts),
    ScreenTimer {
        timer_on: bool,
    },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DrawCommand {
    Clear,
    Font(Font),
    Align(Align),
    Color(Color),
    Text {
        x: i32,
        y: i32,
        text: Text,
    },
    ProgressBar {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        percent: u8,
    },
    FillRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
    },
    Present,
}

fn text(args: fmt::Arguments<'_>) -> Text {
    let mut out = Text::new();
    if out.write_fmt(args).is_err() {
        warn!("render: text truncated to {} bytes", TEXT_CAPACITY);
    }
    out
}

struct Composer {
    list: DrawList,
}

impl Composer {
    fn new() -> Self {
        Self { list: DrawList::new() }
    }

    fn push(&mut self, command: DrawCommand) -> &mut Self {
        if self.list.push(command).is_err() {
            warn!("render: draw list full, command dropped");
        }
        self
    }

    fn clear(&mut self) -> &mut Self {
        self.push(DrawCommand::Clear)
    }

    fn font(&mut self, font: Font) -> &mut Self {
        self.push(DrawCommand::Font(font))
    }

    fn align(&mut self, align: Align) -> &mut Self {
        self.push(DrawCommand::Align(align))
    }

    fn text(&mut self, x: i32, y: i32, text: Text) -> &mut Self {
        self.push(DrawCommand::Text { x, y, text })
    }

    fn label(&mut self, x: i32, y: i32, label: &str) -> &mut Self {
        self.text(x, y, text(format_args!("{label}")))
    }

    fn progress(&mut self, percent: u8) -> &mut Self {
        self.push(DrawCommand::ProgressBar {
            x: PROGRESS_X,
            y: PROGRESS_Y,
            width: PROGRESS_WIDTH,
            height: PROGRESS_HEIGHT,
            percent: percent.min(100),
        })
    }

    /// Restores the default pen and flushes.
    fn finish(&mut self) -> DrawList {
        self.font(Font::Normal).align(Align::Left).push(DrawCommand::Present);
        core::mem::take(&mut self.list)
    }
}

/// Pure composition of one screen.
pub fn compose(screen: &Screen<'_>) -> DrawList {
    let mut c = Composer::new();

    match *screen {
        Screen::Splash { version } => {
            c.clear()
                .align(Align::Center)
                .font(Font::Normal)
                .label(CENTER_X, LINES[0], "NTP Watch")
                .font(Font::Small)
                .text(CENTER_X, LINES[2], text(format_args!("Version {version}")));
        }
        Screen::Clock { fields, redraw } => match redraw {
            RedrawAction::NoRedraw => return DrawList::new(),
            RedrawAction::FullRedraw => {
                c.clear()
                    .font(Font::XLarge)
                    .align(Align::Right)
                    .text(
                        TIME_RIGHT_X,
                        0,
                        text(format_args!("{:02}:{:02}", fields.hour, fields.minute)),
                    )
                    .font(Font::Normal)
                    .align(Align::Left)
                    .text(SECONDS_X, SECONDS_Y, seconds_text(&fields))
                    .font(Font::Small)
                    .align(Align::Center)
                    .text(
                        CENTER_X,
                        DATE_Y,
                        text(format_args!(
                            "{} {}.{}.{}",
                            fields.day_name(),
                            fields.day,
                            fields.month_name(),
                            fields.year
                        )),
                    );
            }
            RedrawAction::PartialRedraw => {
                c.push(DrawCommand::FillRect {
                    x: SECONDS_X,
                    y: SECONDS_Y,
                    width: WIDTH - SECONDS_X as u32,
                    height: SECONDS_HEIGHT,
                    color: Color::Black,
                })
                .push(DrawCommand::Color(Color::White))
                .font(Font::Normal)
                .align(Align::Left)
                .text(SECONDS_X, SECONDS_Y, seconds_text(&fields));
            }
        },
        Screen::JoinStart { refresh } => {
            c.clear().label(
                0,
                LINES[0],
                if refresh { "- Refresh WiFi" } else { "- No WiFi" },
            );
        }
        Screen::Connecting { label } => {
            c.clear()
                .label(0, LINES[0], "Connecting to")
                .label(0, LINES[1], label);
        }
        Screen::BootWifi { connected } => {
            c.clear().label(0, LINES[0], "WiFi connection").label(
                0,
                LINES[2],
                if connected {
                    "+ WiFi Connected"
                } else {
                    "- NO WiFi!"
                },
            );
        }
        Screen::NoWifi => {
            c.clear().label(0, LINES[1], "- NO WiFi");
        }
        Screen::Fetching { task, percent } => {
            c.clear().label(0, LINES[0], task.title()).progress(percent);
        }
        Screen::CompareResult { difference_secs } => {
            c.clear()
                .label(0, LINES[0], COMPARE_TITLE)
                .label(0, LINES[2], "Time difference:")
                .text(0, LINES[4], text(format_args!("-->    {difference_secs}s")));
        }
        Screen::SyncResult { hour, minute } => {
            c.clear()
                .label(0, LINES[0], SYNC_TITLE)
                .font(Font::Large)
                .align(Align::Center)
                .text(CENTER_X, LINES[2], text(format_args!("{hour:02}:{minute:02}")))
                .font(Font::Normal)
                .label(CENTER_X, LINES[4], "Time was updated");
        }
        Screen::InvalidData { task } => {
            c.clear()
                .label(0, LINES[0], task.title())
                .label(0, LINES[2], "- invalid data");
        }
        Screen::UpTime(parts) => {
            c.clear()
                .label(0, LINES[0], "UP-Time:")
                .align(Align::Center)
                .text(CENTER_X, LINES[2], text(format_args!("{} days", parts.days)))
                .text(
                    CENTER_X,
                    LINES[3],
                    text(format_args!(
                        "{:02}:{:02}:{:02}",
                        parts.hours, parts.minutes, parts.seconds
                    )),
                );
        }
        Screen::ScreenTimer { timer_on } => {
            c.clear().align(Align::Center).label(
                CENTER_X,
                LINES[2],
                if timer_on {
                    "Screen Timer: ON"
                } else {
                    "Screen Timer: OFF"
                },
            );
        }
    }

    c.finish()
}

fn seconds_text(fields: &CalendarFields) -> Text {
    text(format_args!(": {:02}", fields.second))
}

/// Applies a composed list to the display, in order.
pub fn execute<S>(list: &DrawList, surface: &mut S) -> Result<(), S::Error>
where
    S: DisplaySurface,
{
    for command in list {
        match command {
            DrawCommand::Clear => surface.clear(),
            DrawCommand::Font(font) => surface.set_font(*font),
            DrawCommand::Align(align) => surface.set_alignment(*align),
            DrawCommand::Color(color) => surface.set_color(*color),
            DrawCommand::Text { x, y, text } => surface.draw_text(*x, *y, text)?,
            DrawCommand::ProgressBar {
                x,
                y,
                width,
                height,
                percent,
            } => surface.draw_progress_bar(*x, *y, *width, *height, *percent)?,
            DrawCommand::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => surface.fill_rect(*x, *y, *width, *height, *color)?,
            DrawCommand::Present => surface.present()?,
        }
    }
    Ok(())
}
