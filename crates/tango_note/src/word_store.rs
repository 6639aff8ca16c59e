//! 单词本的持久化操作
//!
//! 每个操作都是一次独立提交，没有跨请求的事务。

use anyhow::Result;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tango_note_entity::word;
use tracing::debug;

/// 插入一条单词记录，返回带生成 id 的实体
///
/// 三个字段都按原样写入，空字符串也接受，与上游表单行为一致
pub async fn add_word(
    db: &DatabaseConnection,
    english: &str,
    japanese: &str,
    pronunciation: &str,
) -> Result<word::Model> {
    let new_word = word::ActiveModel {
        english: Set(english.to_string()),
        japanese: Set(japanese.to_string()),
        pronunciation: Set(pronunciation.to_string()),
        ..Default::default()
    };

    let model = new_word.insert(db).await?;
    debug!("已保存单词: id={}, english={}", model.id, model.english);
    Ok(model)
}

/// 返回全部单词记录，顺序为存储引擎默认
pub async fn list_words(db: &DatabaseConnection) -> Result<Vec<word::Model>> {
    Ok(word::Entity::find().all(db).await?)
}

/// 按 id 删除，返回是否确实删掉了一行
///
/// 调用方根据返回值决定如何上报未命中，这里不吞掉
pub async fn delete_word(db: &DatabaseConnection, id: i32) -> Result<bool> {
    let result = word::Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
