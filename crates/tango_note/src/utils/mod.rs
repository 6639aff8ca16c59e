use std::fmt;

use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

// 自定义控制台输出层
struct ConsoleLayer;

impl ConsoleLayer {
    fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for ConsoleLayer
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let level = event.metadata().level();

        // 提取日志消息
        let mut visitor = MessageVisitor::new();
        event.record(&mut visitor);

        if let Some(message) = visitor.message {
            let timestamp = Local::now().format("%b %d %H:%M:%S");

            // 根据日志级别设置颜色
            let (color_code, level_str) = match *level {
                tracing::Level::ERROR => ("\x1b[31m", "ERROR"), // 红色
                tracing::Level::WARN => ("\x1b[33m", " WARN"),  // 黄色
                tracing::Level::INFO => ("\x1b[32m", " INFO"),  // 绿色
                tracing::Level::DEBUG => ("\x1b[36m", "DEBUG"), // 青色
                tracing::Level::TRACE => ("\x1b[35m", "TRACE"), // 紫色
            };

            // 时间戳使用灰色（dim），日志级别使用各自的颜色
            println!(
                "\x1b[2m{}\x1b[0m {}{:>5}\x1b[0m {}",
                timestamp, color_code, level_str, message
            );
        }
    }
}

// 用于提取日志消息的访问者
struct MessageVisitor {
    message: Option<String>,
}

impl MessageVisitor {
    fn new() -> Self {
        Self { message: None }
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        }
    }
}

pub fn init_logger(log_level: &str) {
    let console_layer = ConsoleLayer::new().with_filter(build_console_filter(log_level));

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .expect("初始化日志失败");
}

/// 构建日志过滤器，降低 sqlx 等依赖的噪音
fn build_console_filter(base_level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::builder().parse_lossy(format!(
        "{},\
            sqlx::query=error,\
            sqlx=error,\
            sea_orm::database=error,\
            sea_orm_migration=warn,\
            hyper=warn,\
            reqwest=warn,\
            h2=warn",
        base_level
    ))
}
