use crate::api::ApiClient;
use crate::error::{ApiError, FieldError};
use crate::models::{AccommodationRecord, Address, PropertyType};
use serde::{Deserialize, Serialize};
use tracing::info;

const MAX_NAME_LEN: usize = 100;
const MAX_IMAGES: usize = 10;

/// Landlord form for creating or editing an accommodation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationDraft {
    pub name: String,
    pub description: String,
    pub property_type: PropertyType,
    pub address: Address,
    pub images: Vec<String>,
    pub total_rooms: u32,
}

impl AccommodationDraft {
    /// Field-level checks run before anything is sent
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Tên nhà trọ không được để trống"));
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.push(FieldError::new(
                "name",
                format!("Tên tối đa {MAX_NAME_LEN} ký tự"),
            ));
        }

        if self.address.street.trim().is_empty() {
            errors.push(FieldError::new("address.street", "Vui lòng nhập địa chỉ"));
        }
        if self.address.district.trim().is_empty() {
            errors.push(FieldError::new("address.district", "Vui lòng chọn quận/huyện"));
        }
        if self.address.city.trim().is_empty() {
            errors.push(FieldError::new("address.city", "Vui lòng chọn tỉnh/thành phố"));
        }

        if self.total_rooms == 0 {
            errors.push(FieldError::new("totalRooms", "Số phòng phải lớn hơn 0"));
        }

        if self.images.len() > MAX_IMAGES {
            errors.push(FieldError::new(
                "images",
                format!("Tối đa {MAX_IMAGES} ảnh"),
            ));
        }
        if self.images.iter().any(|url| !url.starts_with("https://")) {
            errors.push(FieldError::new("images", "Ảnh phải được tải lên trước"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Deserialize)]
struct AccommodationList {
    accommodations: Vec<AccommodationRecord>,
}

impl ApiClient {
    /// `GET /api/accommodations` for the signed-in owner
    pub async fn list_accommodations(&self) -> Result<Vec<AccommodationRecord>, ApiError> {
        let list: AccommodationList = self
            .get_json("/api/accommodations", &[], "accommodations", "")
            .await?;
        Ok(list.accommodations)
    }

    /// `POST /api/accommodations`
    pub async fn create_accommodation(
        &self,
        draft: &AccommodationDraft,
    ) -> Result<AccommodationRecord, ApiError> {
        draft.validate().map_err(ApiError::Validation)?;
        let builder = self.http().post(self.url("/api/accommodations")).json(draft);
        let created: AccommodationRecord = self.send(builder, "accommodation", "").await?;
        info!("Created accommodation {}", created.id);
        Ok(created)
    }

    /// `PUT /api/accommodations/{id}`
    pub async fn update_accommodation(
        &self,
        id: &str,
        draft: &AccommodationDraft,
    ) -> Result<AccommodationRecord, ApiError> {
        draft.validate().map_err(ApiError::Validation)?;
        let builder = self
            .http()
            .put(self.url(&format!("/api/accommodations/{id}")))
            .json(draft);
        let updated: AccommodationRecord = self.send(builder, "accommodation", id).await?;
        info!("Updated accommodation {}", updated.id);
        Ok(updated)
    }
}
